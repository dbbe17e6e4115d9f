use std::env;
use std::fmt;

/// Environment variable controlling the end-of-process statistics
/// report. The value `NO` disables the report; any other value or its
/// absence enables it.
pub const VERBOSE_ENV: &str = "TAGALLOC_VERBOSE";

/// Cumulative heap accounting. Counters only ever grow; the heap never
/// shrinks and calls are never uncounted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
  /// Total bytes acquired from the OS, fencepost overhead included.
  pub heap_bytes: usize,
  /// Number of arenas acquired from the OS.
  pub arenas: usize,
  /// Calls to `allocate`.
  pub allocate_calls: u64,
  /// Calls to `release`.
  pub release_calls: u64,
  /// Calls to `reallocate`.
  pub reallocate_calls: u64,
  /// Calls to `zero_allocate`.
  pub zero_allocate_calls: u64,
}

impl fmt::Display for HeapStats {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    writeln!(f, "-------------------")?;
    writeln!(f, "HeapSize:\t{} bytes ({} arenas)", self.heap_bytes, self.arenas)?;
    writeln!(f, "# allocates:\t{}", self.allocate_calls)?;
    writeln!(f, "# releases:\t{}", self.release_calls)?;
    writeln!(f, "# reallocates:\t{}", self.reallocate_calls)?;
    writeln!(f, "# zero allocs:\t{}", self.zero_allocate_calls)?;
    write!(f, "-------------------")
  }
}

/// Whether the end-of-process report should be printed.
pub fn verbose_enabled() -> bool {
  match env::var(VERBOSE_ENV) {
    Ok(value) => value != "NO",
    Err(_) => true,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_report_format() {
    let stats = HeapStats {
      heap_bytes: 2097248,
      arenas: 1,
      allocate_calls: 3,
      release_calls: 2,
      reallocate_calls: 1,
      zero_allocate_calls: 0,
    };

    let report = stats.to_string();
    assert!(report.starts_with("-------------------\n"));
    assert!(report.contains("HeapSize:\t2097248 bytes (1 arenas)"));
    assert!(report.contains("# allocates:\t3"));
    assert!(report.contains("# releases:\t2"));
    assert!(report.contains("# reallocates:\t1"));
    assert!(report.contains("# zero allocs:\t0"));
    assert!(report.ends_with("-------------------"));
  }

  #[test]
  fn test_verbose_toggle() {
    // Only the exact value NO disables the report.
    unsafe {
      env::remove_var(VERBOSE_ENV);
      assert!(verbose_enabled());

      env::set_var(VERBOSE_ENV, "NO");
      assert!(!verbose_enabled());

      env::set_var(VERBOSE_ENV, "no");
      assert!(verbose_enabled());

      env::set_var(VERBOSE_ENV, "YES");
      assert!(verbose_enabled());

      env::remove_var(VERBOSE_ENV);
    }
  }
}
