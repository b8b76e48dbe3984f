use slim_codec::SlimValue;

pub const OK: &str = "OK";
pub const VOID: &str = "/__VOID__/";

fn exception_marker(cause: &str, abort: bool) -> String {
    if abort {
        format!("__EXCEPTION__:ABORT_SLIM_TEST: message:<<{cause}>>")
    } else {
        format!("__EXCEPTION__: message:<<{cause}>>")
    }
}

/// An exception kind is treated as batch-aborting when its name contains
/// `stoptest`, case-insensitively (spec.md §4.5, §7 tier 2).
pub fn is_abort_kind(kind_name: &str) -> bool {
    kind_name.to_ascii_lowercase().contains("stoptest")
}

/// Append-only collector of `[id, outcome]` rows for one instruction batch.
///
/// The three `completed*`/`failed` methods are the only way to append a row,
/// mirroring the spec's "Results collector" component — nothing else in the
/// engine builds a result row directly.
#[derive(Debug, Default)]
pub struct Results {
    rows: Vec<SlimValue>,
}

impl Results {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    fn push(&mut self, id: &str, outcome: SlimValue) {
        self.rows
            .push(SlimValue::List(vec![SlimValue::str(id), outcome]));
    }

    pub fn completed(&mut self, id: &str) {
        self.push(id, SlimValue::str(OK));
    }

    pub fn completed_with_value(&mut self, id: &str, value: SlimValue) {
        self.push(id, value);
    }

    pub fn completed_void(&mut self, id: &str) {
        self.push(id, SlimValue::str(VOID));
    }

    /// Records a failure. Returns `true` when the failure's `kind_name`
    /// marks it as batch-aborting, so the engine knows to stop dispatching
    /// the remaining instructions in this batch.
    pub fn failed(&mut self, id: &str, kind_name: &str, cause: &str) -> bool {
        let abort = is_abort_kind(kind_name);
        self.push(id, SlimValue::str(exception_marker(cause, abort)));
        abort
    }

    pub fn into_rows(self) -> Vec<SlimValue> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_failure_is_not_an_abort_marker() {
        let mut results = Results::new();
        let aborted = results.failed("id", "RuntimeError", "NO_INSTANCE foo");
        assert!(!aborted);
        assert_eq!(
            results.into_rows(),
            vec![SlimValue::List(vec![
                SlimValue::str("id"),
                SlimValue::str("__EXCEPTION__: message:<<NO_INSTANCE foo>>"),
            ])]
        );
    }

    #[test]
    fn stoptest_kind_aborts() {
        let mut results = Results::new();
        let aborted = results.failed("id", "MyStopTestException", "boom");
        assert!(aborted);
        assert_eq!(
            results.into_rows(),
            vec![SlimValue::List(vec![
                SlimValue::str("id"),
                SlimValue::str("__EXCEPTION__:ABORT_SLIM_TEST: message:<<boom>>"),
            ])]
        );
    }
}
