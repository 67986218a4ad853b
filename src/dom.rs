use crate::core::SurfaceSize;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// All card containers matching `selector`, in document order.
pub fn query_containers(
    document: &web::Document,
    selector: &str,
) -> anyhow::Result<Vec<web::HtmlElement>> {
    let list = document
        .query_selector_all(selector)
        .map_err(|e| anyhow::anyhow!("querySelectorAll({}): {:?}", selector, e))?;
    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<web::HtmlElement>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

/// Ensure the container has an id so intersection entries can be mapped back.
pub fn ensure_id(container: &web::HtmlElement, index: usize) -> String {
    let id = container.id();
    if !id.is_empty() {
        return id;
    }
    let generated = format!("preview-sketch-{}", index);
    container.set_id(&generated);
    generated
}

#[inline]
pub fn data_attr(el: &web::Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{}", name))
}

#[inline]
pub fn container_size(container: &web::HtmlElement) -> SurfaceSize {
    SurfaceSize::new(
        container.offset_width() as f32,
        container.offset_height() as f32,
    )
}

/// Create a canvas filling `container` (pixel density 1).
pub fn create_canvas(
    document: &web::Document,
    container: &web::HtmlElement,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("create canvas: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    _ = canvas.set_attribute("style", "display:block;touch-action:pan-y");
    set_backing_size(&canvas, container_size(container));
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("append canvas: {:?}", e))?;
    Ok(canvas)
}

pub fn set_backing_size(canvas: &web::HtmlCanvasElement, size: SurfaceSize) {
    canvas.set_width(size.width as u32);
    canvas.set_height(size.height as u32);
    let style = canvas.style();
    _ = style.set_property("width", &format!("{}px", size.width));
    _ = style.set_property("height", &format!("{}px", size.height));
}
