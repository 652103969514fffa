// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;

use super::{SimulatedSettingsApp, SimulatorOptions};
use crate::automation::{display, zoom};
use crate::ax::{
    AccessibilityTree, Action, AttrValue, Attribute, ElementIdentifier, Role, TreeQuery,
};
use crate::config::AutomationConfig;
use crate::model::Value;
use crate::nav::{AccessibilityPane, Category, SettingsApp};
use crate::store::{DefaultsStore, MemoryDefaults};
use crate::wait::Deadline;

const UA: &str = "com.apple.universalaccess";
const MA: &str = "com.apple.mediaaccessibility";

fn simulator(
    store: MemoryDefaults,
    options: SimulatorOptions,
) -> (Arc<MemoryDefaults>, Arc<SimulatedSettingsApp>) {
    let store = Arc::new(store);
    let sim = SimulatedSettingsApp::new(store.clone(), options).expect("simulator");
    (store, Arc::new(sim))
}

#[test]
fn seeds_only_missing_keys() {
    let (store, _sim) = simulator(
        MemoryDefaults::new().with_value(UA, "increaseContrast", Value::Bool(true)),
        SimulatorOptions::default(),
    );

    assert_eq!(store.read(UA, "increaseContrast").expect("read"), Some(Value::Bool(true)));
    assert_eq!(store.read(UA, "reduceMotion").expect("read"), Some(Value::Bool(false)));
    assert_eq!(
        store.read(MA, "__Color__-MADisplayFilterType").expect("read"),
        Some(Value::Integer(1))
    );
    assert!(store.flushes().is_empty());
}

#[test]
fn window_has_the_settings_shape() {
    let (_store, sim) = simulator(MemoryDefaults::new(), SimulatorOptions::default());
    let window = sim.main_window().expect("window").expect("open");

    assert_eq!(sim.title(&window).expect("title").as_deref(), Some("General"));
    assert!(sim.first_child(&window, &Role::Toolbar).expect("toolbar").is_some());
    let row_text = sim
        .descendant(&window, &ElementIdentifier::stable(Category::Mouse.identifier()), None)
        .expect("search");
    assert!(row_text.is_some());
    let back = ElementIdentifier::label("Back", Role::Button);
    assert_eq!(sim.descendant(&window, &back, None).expect("search"), None);
}

#[test]
fn initial_subpane_shows_a_back_button() {
    let options = SimulatorOptions {
        initial_category: Category::Accessibility,
        initial_subpane: Some(AccessibilityPane::Display),
        ..SimulatorOptions::default()
    };
    let (_store, sim) = simulator(MemoryDefaults::new(), options);
    let window = sim.main_window().expect("window").expect("open");

    assert_eq!(sim.title(&window).expect("title").as_deref(), Some("Display"));
    let back = ElementIdentifier::label("Back", Role::Button);
    assert!(sim.descendant(&window, &back, Some(2)).expect("search").is_some());
    let contrast = ElementIdentifier::stable(display::INCREASE_CONTRAST);
    assert!(sim.descendant(&window, &contrast, None).expect("search").is_some());
}

#[test]
fn close_window_removes_the_main_window() {
    let (_store, sim) = simulator(MemoryDefaults::new(), SimulatorOptions::default());
    sim.close_window().expect("close");
    assert_eq!(sim.main_window().expect("window"), None);
}

#[test]
fn not_running_app_has_no_window_until_launched() {
    let options = SimulatorOptions {
        not_running: true,
        ..SimulatorOptions::default()
    };
    let (_store, sim) = simulator(MemoryDefaults::new(), options);
    assert!(!sim.is_running().expect("running"));
    assert_eq!(sim.main_window().expect("window"), None);

    sim.launch().expect("launch");
    let window = sim.main_window().expect("window").expect("open");
    assert_eq!(sim.title(&window).expect("title").as_deref(), Some("General"));
    assert_eq!(sim.launches(), 1);

    sim.terminate().expect("terminate");
    assert!(!sim.is_running().expect("running"));
    assert_eq!(sim.main_window().expect("window"), None);
}

#[tokio::test(start_paused = true)]
async fn lagging_slider_steps_apply_after_their_reads() {
    let options = SimulatorOptions {
        step_lag_reads: 2,
        ..SimulatorOptions::default()
    };
    let (store, sim) = simulator(MemoryDefaults::new(), options);
    let app = SettingsApp::new(sim.clone(), AutomationConfig::default());
    app.navigate_to(&AccessibilityPane::Display.into(), Duration::from_secs(8))
        .await
        .expect("navigate");
    let window = sim.main_window().expect("window").expect("open");
    let slider = sim
        .descendant(&window, &ElementIdentifier::stable(display::CURSOR_SIZE), None)
        .expect("search")
        .expect("slider");

    sim.perform(&slider, Action::Increment).expect("increment");
    assert_eq!(sim.pending_steps(), 1);
    let reads: Vec<_> = (0..3)
        .map(|_| sim.attribute(&slider, Attribute::Value).expect("value"))
        .collect();
    assert_eq!(
        reads,
        vec![
            Some(AttrValue::Number(1.0)),
            Some(AttrValue::Number(1.0)),
            Some(AttrValue::Number(1.25)),
        ]
    );
    assert_eq!(sim.pending_steps(), 0);
    assert_eq!(store.read(UA, "mouseDriverCursorSize").expect("read"), Some(Value::Double(1.25)));
}

#[rstest]
#[case(display::REDUCE_MOTION, UA, "reduceMotion", Value::Bool(true))]
#[case(display::FIND_CURSOR, UA, "CGDisableCursorLocationMagnification", Value::Bool(true))]
#[case(
    display::DISPLAY_FILTER_ENABLED,
    MA,
    "__Color__-MADisplayFilterCategoryEnabled",
    Value::Bool(true)
)]
#[tokio::test(start_paused = true)]
async fn toggled_checkboxes_are_stored(
    #[case] identifier: &str,
    #[case] domain: &str,
    #[case] key: &str,
    #[case] expected: Value,
) {
    let (store, sim) = simulator(MemoryDefaults::new(), SimulatorOptions::default());
    let app = SettingsApp::new(sim.clone(), AutomationConfig::default());
    let pane = app
        .navigate_to(&AccessibilityPane::Display.into(), Duration::from_secs(8))
        .await
        .expect("navigate");

    let before = pane.checkbox_value(identifier).expect("value");
    pane.set_checkbox_value(identifier, !before).expect("toggle");
    assert_eq!(store.read(domain, key).expect("read"), Some(expected));
}

#[tokio::test(start_paused = true)]
async fn controls_reflect_stored_values() {
    let store = MemoryDefaults::new()
        .with_value(UA, "CGDisableCursorLocationMagnification", Value::Bool(true))
        .with_value(UA, "classicInvert", Value::Bool(true))
        .with_value(UA, "mouseDriverCursorSize", Value::Integer(3))
        .with_value(MA, "__Color__-MADisplayFilterType", Value::Integer(4));
    let (_store, sim) = simulator(store, SimulatorOptions::default());
    let app = SettingsApp::new(sim.clone(), AutomationConfig::default());
    let pane = app
        .navigate_to(&AccessibilityPane::Display.into(), Duration::from_secs(8))
        .await
        .expect("navigate");

    assert!(!pane.checkbox_value(display::FIND_CURSOR).expect("shake"));
    assert_eq!(
        pane.selected_radio_label(display::INVERT_COLOR_MODE).expect("mode").as_deref(),
        Some(display::INVERT_MODE_CLASSIC)
    );
    assert_eq!(pane.slider_value(display::CURSOR_SIZE).expect("size"), 3.0);
    assert_eq!(
        pane.popup_value(display::DISPLAY_FILTER_TYPE).expect("filter"),
        "Green/Red filter (Deuteranopia)"
    );
}

#[tokio::test(start_paused = true)]
async fn increasing_contrast_forces_reduced_transparency() {
    let (store, sim) = simulator(MemoryDefaults::new(), SimulatorOptions::default());
    let app = SettingsApp::new(sim.clone(), AutomationConfig::default());
    let pane = app
        .navigate_to(&AccessibilityPane::Display.into(), Duration::from_secs(8))
        .await
        .expect("navigate");

    pane.set_checkbox_value(display::INCREASE_CONTRAST, true).expect("contrast on");
    assert!(pane.checkbox_value(display::REDUCE_TRANSPARENCY).expect("transparency"));
    assert_eq!(store.read(UA, "reduceTransparency").expect("read"), Some(Value::Bool(true)));

    pane.set_checkbox_value(display::INCREASE_CONTRAST, false).expect("contrast off");
    assert!(pane.checkbox_value(display::REDUCE_TRANSPARENCY).expect("transparency"));
}

#[tokio::test(start_paused = true)]
async fn picked_menu_items_are_stored_as_codes() {
    let (store, sim) = simulator(MemoryDefaults::new(), SimulatorOptions::default());
    let app = SettingsApp::new(sim.clone(), AutomationConfig::default());
    let pane = app
        .navigate_to(&AccessibilityPane::Zoom.into(), Duration::from_secs(8))
        .await
        .expect("navigate");

    pane.select_popup_value(zoom::STYLE, "Split Screen", Deadline::after(Duration::from_secs(1)))
        .await
        .expect("select");
    assert_eq!(store.read(UA, "closeViewZoomMode").expect("read"), Some(Value::Integer(2)));
}

#[tokio::test(start_paused = true)]
async fn stuck_back_changes_the_title_but_keeps_the_stack() {
    let options = SimulatorOptions {
        stuck_back_navigation: true,
        initial_category: Category::Accessibility,
        initial_subpane: Some(AccessibilityPane::Zoom),
        ..SimulatorOptions::default()
    };
    let (_store, sim) = simulator(MemoryDefaults::new(), options);
    let window = sim.main_window().expect("window").expect("open");
    let back = sim
        .descendant(&window, &ElementIdentifier::label("Back", Role::Button), Some(2))
        .expect("search")
        .expect("back");

    sim.perform(&back, Action::Press).expect("press");
    sim.perform(&back, Action::Press).expect("press");

    assert_eq!(sim.back_presses(), 2);
    assert_eq!(sim.subpanes(), vec![AccessibilityPane::Zoom]);
    assert_eq!(sim.title(&window).expect("title").as_deref(), Some("Zoom 2"));
}
