use slim_codec::SlimValue;
use slim_context::{CallError, ExecutionContext};
use slim_fixtures::is_filesystem_path;
use slim_values::Value;
use tracing::{debug, trace};

use crate::instruction::{parse, Instruction};
use crate::results::Results;

/// Executes one decoded batch (a top-level `DecodedList` whose elements are
/// themselves instruction lists) against `ctx`, in order, stopping early
/// only when a failure is batch-aborting (spec.md §4.5 "Sequencing").
///
/// Returns the packed `[id, outcome]` rows, ready to hand to `slim_codec::pack`.
pub fn execute_batch(batch: &[SlimValue], ctx: &mut ExecutionContext) -> Vec<SlimValue> {
    let mut results = Results::new();

    for item in batch {
        let Some(instruction_list) = item.as_list() else {
            // A malformed top-level item (not itself a list) has no id to
            // report against; skip rather than panic, matching the engine's
            // general stance of never crashing on a client-supplied shape.
            continue;
        };
        let instruction = parse(instruction_list);
        trace!(id = instruction.id(), "executing instruction");
        if execute_one(&instruction, ctx, &mut results) {
            debug!(
                id = instruction.id(),
                "batch aborted; skipping remaining instructions"
            );
            break;
        }
    }

    results.into_rows()
}

/// Executes a single instruction, appending exactly one row to `results`.
/// Returns whether the batch should stop after this instruction.
fn execute_one(instruction: &Instruction, ctx: &mut ExecutionContext, results: &mut Results) -> bool {
    match instruction {
        Instruction::Import { id, target } => {
            if is_filesystem_path(target) {
                ctx.add_import_path(target);
            } else {
                ctx.add_type_prefix(target);
            }
            results.completed(id);
            false
        }

        Instruction::Make {
            id,
            instance_name,
            class_name,
            args,
        } => {
            let resolved_args = ctx.to_args(args);
            match ctx.make(instance_name, class_name, &resolved_args) {
                Ok(()) => {
                    results.completed(id);
                    false
                }
                Err(err) => {
                    let cause = make_failure_cause(class_name, &err);
                    results.failed(id, "RuntimeError", &cause)
                }
            }
        }

        Instruction::Call {
            id,
            instance_name,
            method_name,
            args,
        } => {
            let resolved_args = ctx.to_args(args);
            dispatch_call(id, instance_name, method_name, &resolved_args, ctx, results)
        }

        Instruction::CallAndAssign {
            id,
            symbol_name,
            instance_name,
            method_name,
            args,
        } => {
            let resolved_args = ctx.to_args(args);
            let mut assigned = None;
            let abort = dispatch_call_capturing(
                id,
                instance_name,
                method_name,
                &resolved_args,
                ctx,
                results,
                &mut assigned,
            );
            if let Some(rendered) = assigned {
                ctx.store_symbol(symbol_name, rendered);
            }
            abort
        }

        Instruction::Unknown { id, tag } => {
            results.failed(id, "RuntimeError", &format!("INVALID_STATEMENT {tag}"))
        }
    }
}

fn dispatch_call(
    id: &str,
    instance_name: &str,
    method_name: &str,
    args: &[SlimValue],
    ctx: &mut ExecutionContext,
    results: &mut Results,
) -> bool {
    let mut discard = None;
    dispatch_call_capturing(id, instance_name, method_name, args, ctx, results, &mut discard)
}

/// Shared `call`/`callAndAssign` path: resolves the instance and method,
/// invokes it, and reports the outcome. `captured_render` receives the
/// string rendering of a successful non-void return so `callAndAssign` can
/// feed it to `store_symbol` without re-converting the value.
fn dispatch_call_capturing(
    id: &str,
    instance_name: &str,
    method_name: &str,
    args: &[SlimValue],
    ctx: &mut ExecutionContext,
    results: &mut Results,
    captured_render: &mut Option<String>,
) -> bool {
    if !ctx.has_instance(instance_name) {
        return results.failed(id, "RuntimeError", &format!("NO_INSTANCE {instance_name}"));
    }

    match ctx.call(instance_name, method_name, args) {
        Ok(Value::Void) => {
            results.completed_void(id);
            false
        }
        Ok(value) => {
            let wire = ctx.converters().to_wire(&value);
            if let SlimValue::Str(rendered) = &wire {
                *captured_render = Some(rendered.clone());
            }
            results.completed_with_value(id, wire);
            false
        }
        Err(CallError::Context(context_err)) => {
            let cause = call_failure_cause(instance_name, method_name, &context_err);
            results.failed(id, "RuntimeError", &cause)
        }
        Err(CallError::Fixture(fixture_err)) => {
            results.failed(id, fixture_err.kind_name(), fixture_err.detail())
        }
    }
}

fn make_failure_cause(class_name: &str, err: &slim_context::ContextError) -> String {
    use slim_context::ContextError::*;
    match err {
        NoSuchClass(name) => format!("NO_CLASS {name}"),
        ConstructorFailed { class, detail } => {
            format!("COULD_NOT_INVOKE_CONSTRUCTOR {class} {detail}")
        }
        NoInstance(_) | NoMethod { .. } => format!("NO_CLASS {class_name} {err}"),
    }
}

fn call_failure_cause(
    instance_name: &str,
    method_name: &str,
    err: &slim_context::ContextError,
) -> String {
    use slim_context::ContextError::*;
    match err {
        NoInstance(name) => format!("NO_INSTANCE {name}"),
        NoMethod { class, method } => format!("NO_METHOD_IN_CLASS {method} {class}"),
        NoSuchClass(_) | ConstructorFailed { .. } => {
            format!("NO_METHOD_IN_CLASS {method_name} {err} ({instance_name})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slim_fixtures::{ClassDescriptor, FixtureCatalog, FixtureError};
    use std::sync::Arc;

    struct Echo(String);

    fn register_echo() {
        let descriptor = ClassDescriptor::new(
            "Echo",
            Arc::new(|_args| Ok(Box::new(Echo(String::new())) as Box<dyn slim_fixtures::FixtureInstance>)),
        )
        .with_method(
            "echo",
            Arc::new(|instance, args| {
                let echo = instance.as_any_mut().downcast_mut::<Echo>().unwrap();
                echo.0 = args
                    .first()
                    .and_then(SlimValue::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(Value::Str(echo.0.clone()))
            }),
        );
        FixtureCatalog::global().register("engine_test.echo", vec![descriptor]);
    }

    fn register_stoptest() {
        struct Bomb;
        let descriptor = ClassDescriptor::new(
            "Bomb",
            Arc::new(|_args| Ok(Box::new(Bomb) as Box<dyn slim_fixtures::FixtureInstance>)),
        )
        .with_method(
            "explode",
            Arc::new(|_instance, _args| Err(FixtureError::StopTest("kaboom".to_string()))),
        );
        FixtureCatalog::global().register("engine_test.bomb", vec![descriptor]);
    }

    #[test]
    fn echo_round_trip_matches_scenario_s1() {
        register_echo();
        let mut ctx = ExecutionContext::new();
        ctx.add_type_prefix("engine_test.echo");

        let batch = vec![
            SlimValue::List(vec![
                SlimValue::str("make_0"),
                SlimValue::str("make"),
                SlimValue::str("eh"),
                SlimValue::str("Echo"),
            ]),
            SlimValue::List(vec![
                SlimValue::str("call_0"),
                SlimValue::str("call"),
                SlimValue::str("eh"),
                SlimValue::str("echo"),
                SlimValue::str("hello"),
            ]),
        ];

        let rows = execute_batch(&batch, &mut ctx);
        assert_eq!(
            rows,
            vec![
                SlimValue::List(vec![SlimValue::str("make_0"), SlimValue::str("OK")]),
                SlimValue::List(vec![SlimValue::str("call_0"), SlimValue::str("hello")]),
            ]
        );
    }

    #[test]
    fn unknown_class_reports_no_class() {
        let mut ctx = ExecutionContext::new();
        let batch = vec![SlimValue::List(vec![
            SlimValue::str("bad"),
            SlimValue::str("make"),
            SlimValue::str("bad"),
            SlimValue::str("NoSuchClass"),
        ])];
        let rows = execute_batch(&batch, &mut ctx);
        let SlimValue::List(pair) = &rows[0] else {
            panic!("expected a pair");
        };
        let outcome = pair[1].as_str().unwrap();
        assert!(outcome.starts_with("__EXCEPTION__: message:<<NO_CLASS NoSuchClass"));
    }

    #[test]
    fn unknown_instance_reports_no_instance() {
        let mut ctx = ExecutionContext::new();
        let batch = vec![SlimValue::List(vec![
            SlimValue::str("id"),
            SlimValue::str("call"),
            SlimValue::str("no_such"),
            SlimValue::str("anything"),
        ])];
        let rows = execute_batch(&batch, &mut ctx);
        let SlimValue::List(pair) = &rows[0] else {
            panic!("expected a pair");
        };
        assert_eq!(
            pair[1].as_str().unwrap(),
            "__EXCEPTION__: message:<<NO_INSTANCE no_such>>"
        );
    }

    #[test]
    fn abort_skips_remaining_instructions_in_batch() {
        register_echo();
        register_stoptest();
        let mut ctx = ExecutionContext::new();
        ctx.add_type_prefix("engine_test.echo");
        ctx.add_type_prefix("engine_test.bomb");

        let batch = vec![
            SlimValue::List(vec![
                SlimValue::str("m"),
                SlimValue::str("make"),
                SlimValue::str("b"),
                SlimValue::str("Bomb"),
            ]),
            SlimValue::List(vec![
                SlimValue::str("c"),
                SlimValue::str("call"),
                SlimValue::str("b"),
                SlimValue::str("explode"),
            ]),
            SlimValue::List(vec![
                SlimValue::str("skipped"),
                SlimValue::str("make"),
                SlimValue::str("eh"),
                SlimValue::str("Echo"),
            ]),
        ];

        let rows = execute_batch(&batch, &mut ctx);
        assert_eq!(rows.len(), 2);
        let SlimValue::List(pair) = &rows[1] else {
            panic!("expected a pair");
        };
        assert_eq!(
            pair[1].as_str().unwrap(),
            "__EXCEPTION__:ABORT_SLIM_TEST: message:<<kaboom>>"
        );
    }

    #[test]
    fn invalid_statement_reports_unknown_tag() {
        let mut ctx = ExecutionContext::new();
        let batch = vec![SlimValue::List(vec![
            SlimValue::str("id"),
            SlimValue::str("frobnicate"),
        ])];
        let rows = execute_batch(&batch, &mut ctx);
        let SlimValue::List(pair) = &rows[0] else {
            panic!("expected a pair");
        };
        assert_eq!(
            pair[1].as_str().unwrap(),
            "__EXCEPTION__: message:<<INVALID_STATEMENT frobnicate>>"
        );
    }
}
