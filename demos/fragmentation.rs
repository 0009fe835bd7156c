use rheap::{Heap, HeapPtr, RegistryKind};
use tracing_subscriber::{EnvFilter, fmt};

const N: usize = 10;

/// Logs at `info` unless `RUST_LOG` says otherwise; `RUST_LOG=rheap=trace`
/// shows every allocation and coalescing pass.
fn init_logging() {
  fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();
}

fn print_state(
  label: &str,
  heap: &Heap,
) {
  println!("\n[{label}] {}", heap.stats());
  for kind in [RegistryKind::Allocated, RegistryKind::Free] {
    print!("{kind} {}", heap.dump(kind));
  }
}

fn main() {
  init_logging();

  let mut heap = Heap::default();
  print_state("start", &heap);

  // --------------------------------------------------------------------
  // 1) Allocate sizes 0..N. Size 0 yields no allocation.
  // --------------------------------------------------------------------
  let ptrs: Vec<Option<HeapPtr>> = (0..N).map(|size| heap.allocate(size).ok()).collect();
  print_state("1: allocated 0..10", &heap);

  // --------------------------------------------------------------------
  // 2) Release every allocation with an even index. The freed chunks
  //    are not merged yet, so the free registry is fragmented.
  // --------------------------------------------------------------------
  for ptr in ptrs.iter().step_by(2) {
    heap.release(*ptr);
  }
  print_state("2: released even indices", &heap);

  // --------------------------------------------------------------------
  // 3) Allocate 10 bytes. The free registry is coalesced first.
  // --------------------------------------------------------------------
  match heap.allocate(10) {
    Ok(ptr) => println!("\n[3] allocate(10) -> {ptr}"),
    Err(error) => println!("\n[3] allocate(10) failed: {error}"),
  }
  print_state("3: after allocate(10)", &heap);

  if let Err(error) = heap.check_invariants() {
    eprintln!("{error}");
    std::process::exit(1);
  }
}
