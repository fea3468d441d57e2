use std::time::Duration;

use serde::Serialize;

use super::log_run_failure;
use crate::config::CorrectnessPolicy;
use crate::error::ExecutionError;
use crate::runner::CodeRunner;
use crate::snippet::Snippet;

pub const MAX_CORRECTNESS: u32 = 5;

/// Returned whenever the snippet cannot be run to a clean exit.
pub const CORRECTNESS_SENTINEL: u32 = 0;

const FUNCTION_DEFINITION: &str = "def ";

const HARNESS_FILE_NAME: &str = "harness.py";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TestCase {
    pub function: &'static str,
    pub args: &'static [i64],
    pub expected: i64,
}

pub const TEST_TABLE: [TestCase; 4] = [
    TestCase { function: "add", args: &[2, 3], expected: 5 },
    TestCase { function: "add", args: &[-1, 1], expected: 0 },
    TestCase { function: "multiply", args: &[2, 3], expected: 6 },
    TestCase { function: "multiply", args: &[-1, 5], expected: -5 },
];

// Executes snippet.py from the working directory and reports "<passed> <total>"
// on its last stdout line. Cases whose function is not defined are not counted.
const HARNESS_TEMPLATE: &str = r#"import json

CASES = json.loads(__CASES__)

namespace = {"__name__": "__snippet__"}
with open("snippet.py", encoding="utf-8") as handle:
    exec(compile(handle.read(), "snippet.py", "exec"), namespace)

passed = 0
total = 0
for case in CASES:
    func = namespace.get(case["function"])
    if not callable(func):
        continue
    total += 1
    try:
        if func(*case["args"]) == case["expected"]:
            passed += 1
    except Exception:
        pass

print()
print(passed, total)
"#;

pub async fn evaluate_correctness(
    runner: &dyn CodeRunner,
    snippet: &Snippet,
    policy: CorrectnessPolicy,
    timeout: Duration,
) -> u32 {
    let result = match policy {
        CorrectnessPolicy::FunctionCount => function_count(runner, snippet, timeout).await,
        CorrectnessPolicy::TestTable => test_table(runner, snippet, timeout).await,
    };

    result.unwrap_or_else(|e| {
        log_run_failure("correctness", &e);
        CORRECTNESS_SENTINEL
    })
}

async fn function_count(
    runner: &dyn CodeRunner,
    snippet: &Snippet,
    timeout: Duration,
) -> Result<u32, ExecutionError> {
    runner.run(snippet.path(), snippet.dir(), timeout).await?;
    let source = snippet.read_source().await?;
    Ok(count_function_definitions(&source))
}

async fn test_table(
    runner: &dyn CodeRunner,
    snippet: &Snippet,
    timeout: Duration,
) -> Result<u32, ExecutionError> {
    let harness = snippet
        .write_companion(HARNESS_FILE_NAME, &harness_source())
        .await?;
    let output = runner.run(&harness, snippet.dir(), timeout).await?;
    let (passed, total) = parse_harness_output(&output.stdout)?;
    Ok(score_from_counts(passed, total))
}

/// Occurrences of `def `, capped at [`MAX_CORRECTNESS`].
pub fn count_function_definitions(source: &str) -> u32 {
    (source.matches(FUNCTION_DEFINITION).count() as u32).min(MAX_CORRECTNESS)
}

/// `round(5 * passed / total)` with ties to even, 0 when nothing was testable.
pub fn score_from_counts(passed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = f64::from(passed.min(total)) / f64::from(total);
    ((f64::from(MAX_CORRECTNESS) * ratio).round_ties_even() as u32).min(MAX_CORRECTNESS)
}

fn harness_source() -> String {
    // A JSON string literal is also a valid Python string literal.
    let cases = serde_json::to_string(&TEST_TABLE).unwrap_or_else(|_| "[]".to_string());
    let literal = serde_json::to_string(&cases).unwrap_or_else(|_| "\"[]\"".to_string());
    HARNESS_TEMPLATE.replace("__CASES__", &literal)
}

fn parse_harness_output(stdout: &str) -> Result<(u32, u32), ExecutionError> {
    let last = stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .ok_or_else(|| ExecutionError::HarnessOutput("no output".to_string()))?;

    let mut parts = last.split_whitespace().map(str::parse::<u32>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(passed)), Some(Ok(total)), None) => Ok((passed, total)),
        _ => Err(ExecutionError::HarnessOutput(last.to_string())),
    }
}
