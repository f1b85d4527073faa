#![no_main]

use libfuzzer_sys::fuzz_target;
use scribe_ai::{plan_insertion, reconcile};

fuzz_target!(|input: &[u8]| {
    let text = String::from_utf8_lossy(input);
    let mut parts = text.splitn(3, '\n');
    let active = parts.next().unwrap_or("");
    let previous = parts.next().unwrap_or("");
    let raw = parts.next().unwrap_or("");

    let remainder = reconcile(active, previous, raw);
    // Re-reconciling the remainder exercises the fixed-point path.
    let again = reconcile(active, previous, &remainder);
    let _ = reconcile(active, previous, &again);

    let _ = plan_insertion(active, &remainder);
});
