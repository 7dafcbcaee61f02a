//! Browser tests, run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use nightsky_engine::{LayerKind, Surface2d};
use nightsky_web::{capability_signals, CanvasSurface, NightskyBackground};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    document.body().unwrap().append_child(&element).unwrap();
    element
}

#[wasm_bindgen_test]
fn test_capability_signals_report_cores_and_agent() {
    let signals = capability_signals(&web_sys::window().unwrap());
    assert!(signals.user_agent.is_some());
    assert!(signals.logical_cores.unwrap_or(1) >= 1);
}

#[wasm_bindgen_test]
fn test_mount_and_unmount_cleans_up_canvases() {
    let host = container();
    let sky = NightskyBackground::new(host.clone(), None).unwrap();
    sky.mount();
    assert!(sky.tier().is_some());

    sky.unmount();
    assert_eq!(sky.state(), "unmounted");
    assert_eq!(host.query_selector_all("canvas").unwrap().length(), 0);
    // No starfield registered: static dots were used and then removed
    assert_eq!(host.style().get_property_value("background-image").unwrap(), "");
}

#[wasm_bindgen_test]
fn test_canvases_stack_beneath_page_content() {
    let document = web_sys::window().unwrap().document().unwrap();
    let host = container();
    let mut nebula = CanvasSurface::create(&document, &host, LayerKind::Nebula).unwrap();
    let mut stars = CanvasSurface::create(&document, &host, LayerKind::ShootingStars).unwrap();

    let z_index = |layer: &str| -> i32 {
        let canvas = host
            .query_selector(&format!("canvas[data-layer=\"{}\"]", layer))
            .unwrap()
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        canvas.style().get_property_value("z-index").unwrap().parse().unwrap()
    };
    assert!(z_index("nebula") < z_index("shooting-stars"));
    assert!(z_index("shooting-stars") < 0);

    nebula.detach();
    stars.detach();
    assert_eq!(host.query_selector_all("canvas").unwrap().length(), 0);
}

#[wasm_bindgen_test]
fn test_invalid_config_is_rejected() {
    let result = NightskyBackground::new(container(), Some("{\"speedScale\": -1}".to_string()));
    assert!(result.is_err());
}
