// Example: infinite scroll with placeholder rows and debounced scroll notifications.
use std::sync::{Arc, Mutex};

use virtual_scroll::{Engine, Entry, LoadMoreEvent, ViewportSize, VirtualScrollOptions};

fn main() {
    // The engine never owns the items; requests are queued here and served by "the backend".
    let requests: Arc<Mutex<Vec<LoadMoreEvent>>> = Arc::default();

    let options = VirtualScrollOptions::new(67)
        .with_initial_viewport(ViewportSize::new(320, 400))
        .with_total_count(Some(230))
        .with_infinite_scroll(true)
        .with_load_more(5, 50)
        .with_on_load_more(Some({
            let requests = Arc::clone(&requests);
            move |e: &LoadMoreEvent| requests.lock().unwrap().push(*e)
        }))
        .with_on_scroll_change(Some(|e: &virtual_scroll::ScrollChangeEvent| {
            println!(
                "  scroll_change visible={}..={} forward={}",
                e.visible_start_index, e.visible_stop_index, e.scroll_forward
            );
        }));

    let mut items: Vec<String> = Vec::new();
    let mut e = Engine::new(options);
    e.start();

    let mut now_ms = 0u64;
    let mut offset = 0u64;
    while e.pagination_state() != virtual_scroll::PaginationState::Exhausted {
        e.on_scroll(offset, now_ms);
        now_ms += 20;
        e.tick(now_ms);

        let pending: Vec<LoadMoreEvent> = requests.lock().unwrap().drain(..).collect();
        for req in pending {
            println!(
                "load_more {}..={} (at index {})",
                req.start_index, req.stop_index, req.load_index
            );
            items.extend((req.start_index..=req.stop_index).map(|i| format!("row {i}")));
            e.sync_items(&items);
        }

        let mut placeholders = 0usize;
        e.for_each_rendered_entry(&items, |entry| {
            if let Entry::Placeholder { .. } = entry {
                placeholders += 1;
            }
        });
        println!(
            "offset={offset} loaded={} data_length={} placeholders_rendered={placeholders}",
            e.loaded_len(),
            e.data_length()
        );

        offset = e.max_scroll_offset();
    }
}
