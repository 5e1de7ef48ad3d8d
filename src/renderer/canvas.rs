//! Canvas 2D backend (browser only)

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement};

use super::scene::DrawCommand;

/// File name offered when exporting the painting
pub const EXPORT_FILE_NAME: &str = "gravity_painting.png";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Attach to a canvas and size it to the simulation's logical size
    pub fn new(canvas: HtmlCanvasElement, width: u32, height: u32) -> Result<Self, JsValue> {
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self { canvas, ctx })
    }

    /// Execute a draw list produced by `build_scene`
    pub fn render(&self, commands: &[DrawCommand]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for cmd in commands {
            match cmd {
                DrawCommand::Clear => {
                    ctx.clear_rect(
                        0.0,
                        0.0,
                        self.canvas.width() as f64,
                        self.canvas.height() as f64,
                    );
                }
                DrawCommand::Rect { min, size, color } => {
                    ctx.set_fill_style_str(&color.to_hex());
                    ctx.fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&color.to_hex());
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                    ctx.fill();
                }
                DrawCommand::Triangle { points, color } => {
                    ctx.set_fill_style_str(&color.to_hex());
                    ctx.begin_path();
                    ctx.move_to(points[0].x as f64, points[0].y as f64);
                    ctx.line_to(points[1].x as f64, points[1].y as f64);
                    ctx.line_to(points[2].x as f64, points[2].y as f64);
                    ctx.close_path();
                    ctx.fill();
                }
            }
        }
        Ok(())
    }

    /// Download the current frame as a PNG (unpainted areas stay transparent)
    pub fn export_png(&self) -> Result<(), JsValue> {
        let data_url = self.canvas.to_data_url_with_type("image/png")?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let link = document
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()?;
        link.set_href(&data_url);
        link.set_download(EXPORT_FILE_NAME);
        link.click();

        log::info!("Exported painting as {}", EXPORT_FILE_NAME);
        Ok(())
    }
}
