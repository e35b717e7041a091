use virtual_scroll::{ScrollBehavior, ViewportSize, VirtualScrollOptions};
use virtual_scroll_adapter::{Controller, Easing};

fn main() {
    // Example: a controller driving a smooth scroll without holding any UI objects.
    //
    // An adapter would:
    // - ask for a smooth scroll (e.g. in response to a "jump to row" command)
    // - call tick(now_ms) in a frame loop
    // - apply the returned offset to the real scroll container (if any)
    // - render the engine's rendered range
    let mut c = Controller::<()>::new(
        VirtualScrollOptions::new(67).with_initial_viewport(ViewportSize::new(320, 600)),
    )
    .with_animation(240, Easing::SmoothStep);
    c.engine_mut().set_loaded_len(10_000);
    c.start();

    let target = c.scroll_to_index(2_000, ScrollBehavior::Smooth, 0);
    println!("target_offset={target:?}");

    let mut now_ms = 0u64;
    while c.is_animating() {
        now_ms += 16;
        if let Some(off) = c.tick(now_ms) {
            if now_ms.is_multiple_of(80) {
                println!("t={now_ms} off={off} visible={:?}", c.visible_range());
            }
        }
    }

    println!(
        "done: off={} rendered={:?}",
        c.scroll_offset(),
        c.rendered_range()
    );
}
