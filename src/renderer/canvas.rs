//! Canvas 2D backend

use js_sys::Array;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::frame::DrawCommand;

/// Executes display lists on a 2D context
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    pub fn paint(&self, cmds: &[DrawCommand]) {
        for cmd in cmds {
            if let Err(e) = self.paint_one(cmd) {
                log::warn!("Draw failed: {:?}", e);
            }
        }
    }

    fn paint_one(&self, cmd: &DrawCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match cmd {
            DrawCommand::Clear { width, height } => {
                ctx.clear_rect(0.0, 0.0, *width as f64, *height as f64);
            }
            DrawCommand::DashedLine {
                from,
                to,
                color,
                width,
                dash,
            } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*width as f64);
                let pattern = Array::of2(
                    &JsValue::from_f64(dash[0] as f64),
                    &JsValue::from_f64(dash[1] as f64),
                );
                ctx.set_line_dash(&pattern)?;
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
                ctx.set_line_dash(&Array::new())?;
            }
            DrawCommand::FillRect {
                origin,
                size,
                color,
            } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
            }
            DrawCommand::Text {
                text,
                center,
                font_px,
                family,
                color,
            } => {
                ctx.set_fill_style_str(color);
                ctx.set_font(&format!("{}px {}", font_px, family));
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                ctx.fill_text(text, center.x as f64, center.y as f64)?;
            }
        }
        Ok(())
    }
}
