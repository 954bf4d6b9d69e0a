use wasm_bindgen::JsCast;

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// Midpoint of two client-space points.
pub fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

/// Distance between two client-space points.
pub fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Bounding client rect of the element with `id`.
pub fn element_rect(id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    Some(element.get_bounding_client_rect())
}

/// Width and height of the element with `id`.
pub fn element_size(id: &str) -> Option<(f64, f64)> {
    element_rect(id).map(|rect| (rect.width(), rect.height()))
}

/// Client point relative to the element with `id`.
pub fn client_to_element(client_x: f64, client_y: f64, id: &str) -> Option<(f64, f64)> {
    let rect = element_rect(id)?;
    Some(client_to_container(client_x, client_y, rect.left(), rect.top()))
}

/// Drop keyboard focus from the element with `id` (closes the on-screen keyboard).
pub fn blur_element(id: &str) {
    let element = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok());
    if let Some(element) = element {
        let _ = element.blur();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_to_container_origin() {
        let (x, y) = client_to_container(100.0, 200.0, 100.0, 200.0);
        assert!((x - 0.0).abs() < 1e-9);
        assert!((y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_container_offset() {
        let (x, y) = client_to_container(450.0, 350.0, 320.0, 50.0);
        assert!((x - 130.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(midpoint((0.0, 0.0), (10.0, -4.0)), (5.0, -2.0));
    }

    #[test]
    fn test_point_distance() {
        assert!((point_distance((0.0, 0.0), (3.0, 4.0)) - 5.0).abs() < 1e-9);
        assert_eq!(point_distance((2.0, 2.0), (2.0, 2.0)), 0.0);
    }
}
