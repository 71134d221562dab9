use akira_motion_core::{MotionEvent, Press, Prop};
use akira_site_core::components::navbar::{GET_STARTED, VIEW_PRICING};
use akira_site_core::{
    AnimationDemo, App, Footer, HeroSection, HomePage, Navbar, QuickTest, SiteConfig, SiteError,
};
use approx::assert_relative_eq;

fn value(app: &App, el: akira_motion_core::ElementId, prop: Prop) -> f32 {
    app.cx().scene().get(el).unwrap().value(prop)
}

#[test]
fn navbar_renders_signed_out_actions_and_toggles() {
    let mut app = App::default();
    let nav = app.mount(Navbar::default());
    let html = app.render_html(nav).unwrap();
    assert_eq!(html.matches(GET_STARTED).count(), 2);
    assert_eq!(html.matches(VIEW_PRICING).count(), 2);
    assert!(html.contains("href=\"/pricing\""));

    let open = app.with_component(nav, |n: &mut Navbar, cx, _| n.toggle(cx)).unwrap();
    assert!(open);
    app.tick(1.0);
    let menu = app.mounted(nav).unwrap().get("menu").unwrap();
    assert_relative_eq!(value(&app, menu, Prop::X), 0.0);

    // choosing an item closes the drawer; a second close does nothing
    let closed = app.with_component(nav, |n: &mut Navbar, cx, _| n.close(cx)).unwrap();
    assert!(closed.is_some());
    let again = app.with_component(nav, |n: &mut Navbar, cx, _| n.close(cx)).unwrap();
    assert!(again.is_none());
    assert!(!app.component::<Navbar>(nav).unwrap().is_open());
}

#[test]
fn home_page_reveals_footer_on_scroll() {
    let mut app = App::default();
    let home = app.mount(HomePage::new(&SiteConfig::default()));
    assert!(app.render_html(home).unwrap().contains("Welcome to Akira"));
    let footer = app.mounted(home).unwrap().get("footer").unwrap();
    assert_eq!(value(&app, footer, Prop::Opacity), 0.0);

    app.tick(1.0);
    assert_eq!(value(&app, footer, Prop::Opacity), 0.0);
    app.scroll_to(400.0);
    let out = app.tick(1.0);
    assert!(out.has_event(|e| matches!(e, MotionEvent::AnimationCompleted { .. })));
    assert_relative_eq!(value(&app, footer, Prop::Opacity), 1.0);
    let html = app.render_html(home).unwrap();
    assert!(!html.contains("opacity: 0"));
}

#[test]
fn hero_text_slides_up_on_mount() {
    let mut app = App::default();
    let hero = app.mount(HeroSection::default());
    let title = app.mounted(hero).unwrap().get("title").unwrap();
    assert_eq!(value(&app, title, Prop::Y), 100.0);
    app.tick(2.0);
    assert_relative_eq!(value(&app, title, Prop::Y), 0.0);
    assert_relative_eq!(value(&app, title, Prop::Opacity), 1.0);
    assert!(app.render_html(hero).unwrap().contains(akira_site_core::components::hero::DEFAULT_TITLE));
}

#[test]
fn demo_card_grid_staggers_in_when_scrolled_to() {
    let mut app = App::default();
    app.mount(HeroSection::default());
    let demo = app.mount(AnimationDemo::new());
    let mounted = app.mounted(demo).unwrap().clone();
    let grid = mounted.get("grid").unwrap();
    let top = app.cx().scene().get(grid).unwrap().rect.y;
    let cards: Vec<_> = (1..=6).map(|i| mounted.get(&format!("card-{i}")).unwrap()).collect();
    for c in &cards {
        assert_eq!(value(&app, *c, Prop::Opacity), 0.0);
        assert_eq!(value(&app, *c, Prop::Y), 50.0);
    }

    // container delay 0.2, then 0.1 per card: card 6 starts 0.5 after card 1
    app.scroll_to(top - 700.0);
    app.tick(0.65);
    assert!(value(&app, cards[4], Prop::Y) < 50.0);
    assert_eq!(value(&app, cards[5], Prop::Y), 50.0);
    app.tick(0.35);
    assert_relative_eq!(value(&app, cards[0], Prop::Opacity), 1.0);
    assert_relative_eq!(value(&app, cards[0], Prop::Y), 0.0);
    let y6 = value(&app, cards[5], Prop::Y);
    assert!(y6 > 0.0 && y6 < 50.0);
    app.tick(0.5);
    for c in &cards {
        assert_relative_eq!(value(&app, *c, Prop::Opacity), 1.0);
        assert_relative_eq!(value(&app, *c, Prop::Y), 0.0);
    }

    // pointer input on a card
    app.with_component(demo, |d: &mut AnimationDemo, cx, _| {
        d.card_mut(2).unwrap().hover_start(cx);
    });
    app.tick(1.0);
    assert!(value(&app, cards[2], Prop::Scale) > 1.0);
}

#[test]
fn unmount_restores_trigger_count_and_scene() {
    let mut app = App::default();
    app.mount(Navbar::default());
    let base_triggers = app.cx().active_trigger_count();
    let base_elements = app.cx().scene().len();

    for _ in 0..2 {
        let demo = app.mount(AnimationDemo::new());
        let footer = app.mount(Footer::default());
        // heading + grid + five scroll cards, and the footer reveal
        assert_eq!(app.cx().active_trigger_count(), base_triggers + 8);
        app.scroll_to(1500.0);
        app.tick(0.3);
        assert!(app.unmount(demo).unwrap() > 0);
        app.unmount(footer).unwrap();
        assert_eq!(app.cx().active_trigger_count(), base_triggers);
        assert_eq!(app.cx().scene().len(), base_elements);
        assert!(app.cx().engine().is_empty());
        app.scroll_to(0.0);
    }

    let missing = app.mount(QuickTest::new());
    app.unmount(missing).unwrap();
    assert!(matches!(app.unmount(missing), Err(SiteError::NotMounted(_))));
}

#[test]
fn quick_test_block_and_button() {
    let mut app = App::default();
    let qt = app.mount(QuickTest::new());
    let block = app.mounted(qt).unwrap().get("block").unwrap();
    assert_eq!(value(&app, block, Prop::Opacity), 0.0);
    app.tick(0.3);
    let mid = value(&app, block, Prop::Opacity);
    assert!(mid > 0.0 && mid < 1.0);
    app.tick(0.3);
    assert_relative_eq!(value(&app, block, Prop::Opacity), 1.0, epsilon = 1e-5);
    assert_relative_eq!(value(&app, block, Prop::Y), 0.0, epsilon = 1e-4);

    let button = app.mounted(qt).unwrap().get("button").unwrap();
    app.with_component(qt, |q: &mut QuickTest, cx, _| {
        let b = q.button_mut().unwrap();
        b.hover_start(cx);
        b.tap_start(cx);
    });
    app.tick(1.0);
    assert_relative_eq!(value(&app, button, Prop::Scale), 0.95, epsilon = 1e-5);
    app.with_component(qt, |q: &mut QuickTest, cx, _| {
        let b = q.button_mut().unwrap();
        b.tap_end(cx);
        assert_eq!(b.state(), Some(Press::Hover));
    });
    app.tick(1.0);
    assert_relative_eq!(value(&app, button, Prop::Scale), 1.05, epsilon = 1e-5);
}
