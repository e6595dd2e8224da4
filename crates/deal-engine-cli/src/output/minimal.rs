use serde_json::Value;

/// Print just the key answer from the output.
///
/// Heuristic: prefer well-known headline fields in priority order,
/// then fall back to the first field of the result object.
pub fn print_minimal(value: &Value) {
    // Unwrap the computation envelope when present
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "irr",
        "moic",
        "cash_on_cash",
        "cap_rate",
        "dscr",
        "monthly_noi",
        "mao",
        "projected_profit",
        "cash_out",
        "deferred_gain",
        "monthly_payment",
        "effective_payment",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Schedules and event lists: one line per row count
    if let Value::Array(arr) = result_obj {
        println!("{} rows", arr.len());
        return;
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
