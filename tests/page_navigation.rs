/*
 *  tests/page_navigation.rs
 *
 *  Integration tests for page navigation, stacking and overlays
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 */

use duonav::config::{Config, InterfaceConfig};
use duonav::facility::FacilityKind;
use duonav::input::{InputEvent, Side};
use duonav::pages::{MainPage, OverlayKind, PageKind, WIZARD_STEPS};

fn main_page() -> MainPage {
    MainPage::from_config(&Config::default()).unwrap()
}

/// Feed one scripted event, the same text the binary reads
fn ev(main: &mut MainPage, line: &str) -> bool {
    let event: InputEvent = line.parse().unwrap();
    main.handle_event(event).unwrap()
}

fn evs(main: &mut MainPage, lines: &[&str]) {
    for line in lines {
        ev(main, line);
    }
}

#[test]
fn test_category_cycle_remembers_subpage() {
    let mut main = main_page();
    assert!(ev(&mut main, "InnerKnobL:Right"));
    assert_eq!(main.left_page_name(), "NAV 2");

    assert!(ev(&mut main, "OuterKnobL:Right"));
    assert_eq!(main.left_page_name(), "FPL");
    assert!(ev(&mut main, "OuterKnobL:Left"));
    assert_eq!(main.left_page_name(), "NAV 2");

    // SET 0 brings up the wizard, which holds the outer knob
    evs(&mut main, &["OuterKnobL:Right", "OuterKnobL:Right"]);
    assert_eq!(main.left_page_name(), "SET 0");
    assert_eq!(main.overlay_kind(), Some(OverlayKind::DatabaseWizard));
    ev(&mut main, "OuterKnobL:Right");
    assert_eq!(main.left_page_name(), "SET 0");

    for _ in 0..WIZARD_STEPS {
        ev(&mut main, "Enter");
    }
    assert_eq!(main.left_page_name(), "SET 1");
    assert!(!main.overlays().shown());

    // OTH STA MOD CTR REF ACT D/T NAV
    for _ in 0..8 {
        ev(&mut main, "OuterKnobL:Right");
    }
    assert_eq!(main.left_page_name(), "NAV 2");

    // a full lap of ten categories now passes SET 1 without the wizard
    for _ in 0..10 {
        ev(&mut main, "OuterKnobL:Right");
    }
    assert_eq!(main.left_page_name(), "NAV 2");
    assert_eq!(main.right_page_name(), "NAV 2");
}

#[test]
fn test_super_nav1_follows_both_halves() {
    let mut main = main_page();
    assert!(ev(&mut main, "InnerKnobR:Left"));
    assert_eq!(main.right_page_name(), "NAV 1");
    assert_eq!(main.overlay_kind(), Some(OverlayKind::SuperNav1));

    // nothing on the overlay for the cursor to land on
    assert!(!ev(&mut main, "CursorToggleR"));

    // with the overlay cursor off the knob still walks the tree
    assert!(ev(&mut main, "InnerKnobR:Right"));
    assert_eq!(main.right_page_name(), "NAV 2");
    assert!(!main.overlays().shown());
}

#[test]
fn test_overlay_cursor_takes_knob_before_tree() {
    let mut main = main_page();
    ev(&mut main, "InnerKnobL:Left");
    assert_eq!(main.left_page_name(), "NAV 5");
    evs(&mut main, &["InnerKnobR:Left", "InnerKnobR:Left"]);
    assert_eq!(main.right_page_name(), "NAV 5");
    assert_eq!(main.overlay_kind(), Some(OverlayKind::SuperNav5));

    assert!(ev(&mut main, "CursorToggleR"));
    assert!(ev(&mut main, "InnerKnobR:Right"));
    assert_eq!(main.right_page_name(), "NAV 5");
    let overlay = main.overlays().top().unwrap();
    assert_eq!(overlay.cursor(Side::Right).field(0).map(|f| f.text()), Some("21".to_string()));

    assert!(ev(&mut main, "CursorToggleR"));
    assert!(ev(&mut main, "OuterKnobR:Right"));
    assert_eq!(main.right_page_name(), "FPL");
    assert!(!main.overlays().shown());
}

#[test]
fn test_overlays_track_top_pages_over_a_knob_walk() {
    let mut main = main_page();
    let events = [
        "InnerKnobL:Left",
        "InnerKnobL:Right",
        "InnerKnobR:Left",
        "InnerKnobR:Right",
        "OuterKnobL:Left",
        "OuterKnobL:Right",
        "OuterKnobR:Left",
        "OuterKnobR:Right",
    ];
    let mut seed: u32 = 0x2545_f491;
    for _ in 0..400 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let line = events[(seed >> 16) as usize % events.len()];
        ev(&mut main, line);

        let before: Vec<OverlayKind> = main.overlays().kinds().collect();
        main.check_if_overlay_is_shown();
        main.check_if_overlay_is_shown();
        let after: Vec<OverlayKind> = main.overlays().kinds().collect();
        assert_eq!(before, after, "overlay check not idempotent after {line}");

        let left = main.page(Side::Left).kind();
        let right = main.page(Side::Right).kind();
        assert_eq!(
            main.overlays().contains(OverlayKind::SuperNav1),
            left == PageKind::Nav1 && right == PageKind::Nav1
        );
        assert_eq!(main.overlays().contains(OverlayKind::DatabaseWizard), left == PageKind::Set0);
        assert!(main.stack(Side::Left).len() >= 1);
        assert!(main.stack(Side::Right).len() >= 1);
    }
}

#[test]
fn test_active_plan_detail_pages_follow_their_parent() {
    let mut main = main_page();
    evs(&mut main, &["OuterKnobL:Left", "OuterKnobL:Left"]);
    assert_eq!(main.left_page_name(), "ACT");
    let act = main.page(Side::Left).id();

    assert!(ev(&mut main, "CursorToggleL"));
    assert!(ev(&mut main, "Enter"));
    assert_eq!(main.right_page_name(), "APT 1");
    assert_eq!(main.stack(Side::Right).len(), 2);
    assert_eq!(main.stack(Side::Right).top_parent(), Some(act));

    // inner knob walks the detail pages of the same airport
    assert!(ev(&mut main, "InnerKnobR:Right"));
    assert_eq!(main.right_page_name(), "APT 2");
    assert_eq!(main.page(Side::Right).facility().map(|f| f.ident.as_str()), Some("KSEA"));
    assert_eq!(main.stack(Side::Right).len(), 2);

    // another row replaces the detail instead of stacking a second one
    assert!(ev(&mut main, "OuterKnobL:Right"));
    assert!(ev(&mut main, "Enter"));
    assert_eq!(main.right_page_name(), "VOR 1");
    assert_eq!(main.page(Side::Right).facility().map(|f| f.kind), Some(FacilityKind::Vor));
    assert_eq!(main.stack(Side::Right).len(), 2);

    // leaving ACT takes the detail page with it
    assert!(ev(&mut main, "CursorToggleL"));
    assert!(ev(&mut main, "OuterKnobL:Right"));
    assert_eq!(main.left_page_name(), "D/T 1");
    assert_eq!(main.right_page_name(), "NAV 2");
    assert_eq!(main.stack(Side::Right).len(), 1);
}

#[test]
fn test_direct_to_with_duplicate_ident() {
    let mut main = main_page();
    assert!(ev(&mut main, "DirectTo"));
    assert_eq!(main.right_page_name(), "D->");

    evs(&mut main, &["KeyboardR:P", "KeyboardR:A", "KeyboardR:E"]);
    assert!(ev(&mut main, "Enter"));
    assert_eq!(main.right_page_name(), "DUP IDNT");
    assert_eq!(main.stack(Side::Right).len(), 3);
    assert!(main.pending().is_some());

    // second candidate is the NDB
    assert!(ev(&mut main, "OuterKnobR:Right"));
    assert!(ev(&mut main, "Enter"));
    assert!(main.pending().is_none());
    assert_eq!(main.right_page_name(), "D->");
    assert_eq!(main.page(Side::Right).facility().map(|f| f.kind), Some(FacilityKind::Ndb));
    assert_eq!(main.page(Side::Right).cursor().focused_index(), Some(1));

    assert!(ev(&mut main, "Enter"));
    assert_eq!(main.state().direct_to.as_ref().map(|f| f.ident.as_str()), Some("PAE"));
    assert_eq!(main.right_page_name(), "NAV 2");
    assert_eq!(main.stack(Side::Right).len(), 1);
}

#[test]
fn test_clear_on_chooser_abandons_lookup() {
    let mut main = main_page();
    evs(&mut main, &["DirectTo", "KeyboardR:P", "KeyboardR:A", "KeyboardR:E", "Enter"]);
    assert_eq!(main.right_page_name(), "DUP IDNT");

    assert!(ev(&mut main, "Clear"));
    assert!(main.pending().is_none());
    assert_eq!(main.right_page_name(), "D->");
    let ident = main.page(Side::Right).cursor().field(0).unwrap();
    assert!(!ident.is_entered());
    assert_eq!(ident.text(), "");
}

#[test]
fn test_popping_chooser_abandons_lookup() {
    let mut main = main_page();
    evs(&mut main, &["DirectTo", "KeyboardR:P", "KeyboardR:A", "KeyboardR:E", "Enter"]);
    assert!(main.pending().is_some());

    let chooser = main.pop_page(Side::Right).unwrap();
    assert_eq!(chooser.kind(), PageKind::Disambiguation);
    assert!(main.pending().is_none());
    assert_eq!(main.right_page_name(), "D->");

    // the ident is editable again
    assert!(ev(&mut main, "KeyboardR:S"));
    assert!(main.page(Side::Right).cursor().field(0).unwrap().is_entered());
}

#[test]
fn test_database_wizard_runs_to_set1() {
    let mut main = main_page();
    evs(&mut main, &["OuterKnobL:Right", "OuterKnobL:Right"]);
    assert_eq!(main.left_page_name(), "SET 0");
    assert_eq!(main.overlay_kind(), Some(OverlayKind::DatabaseWizard));

    // the wizard keeps the knobs for itself
    assert!(!ev(&mut main, "OuterKnobL:Right"));
    assert_eq!(main.left_page_name(), "SET 0");

    for _ in 0..3 {
        assert!(ev(&mut main, "Enter"));
    }
    assert_eq!(main.left_page_name(), "SET 1");
    assert!(!main.overlays().shown());

    // the tree remembers where the wizard left the SET category
    evs(&mut main, &["OuterKnobL:Right", "OuterKnobL:Left"]);
    assert_eq!(main.left_page_name(), "SET 1");
}

#[test]
fn test_database_wizard_clear_skips_to_set1() {
    let mut main = main_page();
    evs(&mut main, &["OuterKnobL:Right", "OuterKnobL:Right"]);
    assert!(ev(&mut main, "Clear"));
    assert_eq!(main.left_page_name(), "SET 1");
    assert!(!main.overlays().shown());
}

#[test]
fn test_message_review_masks_the_halves() {
    let mut main = main_page();
    main.state_mut().push_message("CHECK FUEL");
    assert_eq!(main.state().unread(), 1);

    assert!(ev(&mut main, "Message"));
    assert!(main.is_message_page_shown());
    assert_eq!(main.state().unread(), 0);
    assert_eq!(main.visible_regions().len(), 1);

    main.tick(true);
    main.tick(false);
    assert_eq!(main.page(Side::Left).ticks(), 0);
    assert_eq!(main.overlays().top().map(|o| o.ticks()), Some(2));

    assert!(!ev(&mut main, "OuterKnobL:Right"));
    assert_eq!(main.left_page_name(), "NAV 1");

    assert!(ev(&mut main, "Clear"));
    assert!(!main.is_message_page_shown());
    main.tick(true);
    assert_eq!(main.page(Side::Left).ticks(), 1);
    assert_eq!(main.visible_regions().len(), 2);
}

#[test]
fn test_message_review_stacks_over_super_nav() {
    let mut main = main_page();
    ev(&mut main, "InnerKnobR:Left");
    assert_eq!(main.overlay_kind(), Some(OverlayKind::SuperNav1));

    assert!(ev(&mut main, "Message"));
    assert!(main.is_message_page_shown());
    assert_eq!(main.overlays().len(), 2);

    assert!(ev(&mut main, "Message"));
    assert_eq!(main.overlay_kind(), Some(OverlayKind::SuperNav1));
}

#[test]
fn test_flight_plan_activation_reloads_act() {
    let mut main = main_page();
    evs(&mut main, &["OuterKnobR:Left", "OuterKnobR:Left"]);
    assert_eq!(main.right_page_name(), "ACT");
    assert_eq!(main.page(Side::Right).cursor().len(), 4);

    assert!(ev(&mut main, "OuterKnobL:Right"));
    assert_eq!(main.left_page_name(), "FPL");
    assert!(ev(&mut main, "InnerKnobL:Right"));
    assert_eq!(main.page(Side::Left).current_subpage(), 1);
    assert_eq!(main.page(Side::Left).cursor().len(), 3);

    assert!(ev(&mut main, "Enter"));
    let active: Vec<&str> = main.state().plans[0].iter().map(|f| f.ident.as_str()).collect();
    assert_eq!(active, vec!["KBFI", "OLM", "KOLM"]);
    assert_eq!(main.page(Side::Right).cursor().len(), 3);
}

#[test]
fn test_scan_steps_through_same_type() {
    let mut main = main_page();
    evs(&mut main, &["OuterKnobR:Right", "OuterKnobR:Right", "OuterKnobR:Right"]);
    assert_eq!(main.right_page_name(), "VOR 1");
    assert_eq!(main.page(Side::Right).facility().map(|f| f.ident.as_str()), Some("SEA"));

    assert!(!ev(&mut main, "ScanKnob:Right"));
    assert!(ev(&mut main, "ScanToggle"));
    assert!(ev(&mut main, "ScanKnob:Right"));
    assert_eq!(main.page(Side::Right).facility().map(|f| f.ident.as_str()), Some("PAE"));
    assert_eq!(main.page(Side::Right).cursor().field(0).map(|f| f.text()), Some("PAE".to_string()));

    // scanning is not masked by the message overlay
    ev(&mut main, "Message");
    assert!(ev(&mut main, "ScanKnob:Right"));
    assert_eq!(main.page(Side::Right).facility().map(|f| f.ident.as_str()), Some("OLM"));
}

#[test]
fn test_pushed_pages_cascade_across_sides() {
    let mut main = main_page();
    let base = main.page(Side::Left).id();

    let a = main.build_page(PageKind::Ref);
    let a_id = a.id();
    main.push_page(Side::Left, a, Some(base));
    let b = main.build_page(PageKind::Sta1);
    let b_id = b.id();
    main.push_page(Side::Right, b, Some(a_id));
    let c = main.build_page(PageKind::Mod);
    main.push_page(Side::Right, c, None);

    // an unrelated pop leaves the child alone
    main.pop_page(Side::Right).unwrap();
    assert!(main.stack(Side::Right).contains(b_id));

    main.pop_page(Side::Left).unwrap();
    assert!(!main.stack(Side::Right).contains(b_id));
    assert_eq!(main.stack(Side::Right).len(), 1);
    assert!(main.stack(Side::Left).is_base_shown());
}

#[test]
fn test_interface_prunes_catalog() {
    let plain = main_page();
    assert!(!plain.tree(Side::Left).tree().contains(PageKind::Oth5));
    assert!(!plain.tree(Side::Right).tree().contains(PageKind::Cal4));

    let config = Config {
        interface: Some(InterfaceConfig {
            fuel_management: true,
            air_data: true,
        }),
        ..Config::default()
    };
    let main = MainPage::from_config(&config).unwrap();
    assert!(main.tree(Side::Left).tree().contains(PageKind::Oth5));
    assert!(main.tree(Side::Left).tree().contains(PageKind::Oth6));
    assert!(main.tree(Side::Right).tree().contains(PageKind::Cal4));
}
