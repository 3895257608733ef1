use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Print preformatted lines, one per item.
pub fn output_lines<I>(lines: I)
where
    I: IntoIterator<Item = String>,
{
    for line in lines {
        println!("{line}");
    }
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    match value {
        Value::Array(items) => Ok(render_array_table(&items)),
        Value::Object(map) => {
            // Responses carrying a record plus its audit entries render as two tables.
            if let (Some(record), Some(Value::Array(entries))) = (map.get("record"), map.get("entries")) {
                let mut out = render_table(record)?;
                out.push_str("\n\n");
                out.push_str(&render_array_table(entries));
                return Ok(out);
            }
            let headers = ["key", "value"];
            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), value_to_cell(value)])
                .collect::<Vec<_>>();
            Ok(table::render_entity_table(&headers, &rows, table_options()))
        }
        scalar => {
            let rows = vec![vec![value_to_cell(&scalar)]];
            Ok(table::render_entity_table(&["value"], &rows, table_options()))
        }
    }
}

fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&["value"], &rows, table_options());
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    if headers.is_empty() {
        return String::from("(no columns)");
    }

    headers.sort();

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, table_options())
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Coupon {
        id: i64,
        code: &'static str,
    }

    #[derive(Serialize)]
    struct Mutation {
        record: Coupon,
        entries: Vec<Coupon>,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Coupon { id: 1, code: "SPRING" };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["code"], "SPRING");
        assert_eq!(parsed["id"], 1);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = Coupon { id: 1, code: "SPRING" };
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_for_empty_list() {
        let out = render(&Vec::<Coupon>::new(), OutputFormat::Table).expect("table should render");
        assert_eq!(out, "(no rows)");
    }

    #[test]
    fn table_render_has_header_divider_and_rows() {
        let rows = vec![Coupon { id: 1, code: "A" }, Coupon { id: 2, code: "B" }];
        let out = render(&rows, OutputFormat::Table).expect("table should render");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("code"));
        assert!(lines[1].chars().all(|c| c == '-'));
    }

    #[test]
    fn mutation_renders_record_and_entries() {
        let value = Mutation {
            record: Coupon { id: 1, code: "A" },
            entries: vec![Coupon { id: 9, code: "B" }],
        };
        let out = render(&value, OutputFormat::Table).expect("table should render");
        let (record, entries) = out.split_once("\n\n").expect("two tables");
        assert!(record.starts_with("key"));
        assert!(entries.starts_with("code"));
    }
}
