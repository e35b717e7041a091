// Example: fixed-size rows, a scroll signal and the ranges it produces.
use virtual_scroll::{Engine, ViewportSize, VirtualScrollOptions};

fn main() {
    let mut e = Engine::<()>::new(
        VirtualScrollOptions::new(104).with_initial_viewport(ViewportSize::new(320, 600)),
    );
    e.set_loaded_len(1_000_000);
    e.start();

    e.on_scroll(123_456, 0);
    println!("effective_item_size={}", e.effective_item_size());
    println!("total_size={}", e.total_size());
    println!("ranges={:?}", e.ranges());
    println!("rendered_range={:?}", e.rendered_range());

    let mut rendered = Vec::new();
    e.for_each_rendered_index(|i| rendered.push(i));
    println!("rendered_len={} first={:?}", rendered.len(), rendered.first());
}
