//! Drive a fieldtip instance against the simulated page and print what
//! the host would observe at each step.
//!
//! ```bash
//! cargo run -p fieldtip-harness --example walkthrough
//! ```

use fieldtip::{Event, FieldRole, FieldTip, HostPage, PointerTarget};
use fieldtip_core::{ParamBag, Rect};
use fieldtip_harness::{Clock, SimPage};

fn main() {
    let mut page = SimPage::new(Rect::from_size(800.0, 600.0));
    let field = page.add_field(
        page.root(),
        FieldRole::TextInput,
        Some("email"),
        Rect::new(280.0, 100.0, 300.0, 60.0),
    );
    page.add_label(field, Some("email"), Rect::new(284.0, 104.0, 80.0, 20.0));

    let params = ParamBag::from_value(serde_json::json!({
        "target": "email",
        "content": "We only use this address for order updates.\nNo newsletters.",
        "placement": "auto",
    }));

    let mut clock = Clock::new();
    let mut tip = FieldTip::init(&mut page, &params, || {}, clock.now());

    tip.tick(&mut page, clock.advance(100));
    println!("after first retry rung: anchor = {:?}", tip.anchor());

    tip.handle_event(&mut page, Event::PointerEnter(PointerTarget::Icon), clock.now());
    println!("pointer entered: state = {:?}", tip.visibility());

    tip.tick(&mut page, clock.advance(300));
    tip.on_frame(&mut page);
    let (top, left, side) = page.panel.placed.expect("panel placed");
    println!(
        "panel presented {:?} of the icon at top={top} left={left}: {:?}",
        side, page.panel.body
    );

    tip.handle_event(&mut page, Event::PointerLeave(PointerTarget::Icon), clock.now());
    tip.tick(&mut page, clock.advance(100));
    println!("pointer left: state = {:?}", tip.visibility());

    tip.destroy(&mut page);
    println!(
        "destroyed: icons={} styles={} panel_created={}",
        page.icons.len(),
        page.styles.len(),
        page.panel.created
    );
}
