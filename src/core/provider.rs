use calamine::{open_workbook, Reader, Xlsx};
use std::path::Path;

/// Default workbook filename, resolved relative to the template base
/// directory.
pub const PROVIDER_WORKBOOK: &str = "provider_addresses.xlsx";

/// Looks up a provider id in the address workbook and formats a
/// three-line postal address (`name`, `street`, `"zip city"`). Address
/// enrichment is best-effort: every failure mode (missing file,
/// unreadable workbook, empty sheet, missing columns, no matching row)
/// degrades to an empty string, never an error.
pub fn provider_address(workbook_path: &Path, provider_id: &str) -> String {
    match lookup(workbook_path, provider_id) {
        Some(addr) => addr,
        None => {
            tracing::debug!(
                "No provider address for '{}' in {}",
                provider_id,
                workbook_path.display()
            );
            String::new()
        }
    }
}

fn lookup(workbook_path: &Path, provider_id: &str) -> Option<String> {
    if !workbook_path.exists() {
        return None;
    }

    let mut workbook: Xlsx<_> = open_workbook(workbook_path).ok()?;
    let range = workbook.worksheet_range_at(0)?.ok()?;
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()?
        .iter()
        .map(|c| c.to_string().trim().to_lowercase())
        .collect();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let id_col = column("id")?;

    let wanted = provider_id.trim();
    if wanted.is_empty() {
        return None;
    }
    for row in rows {
        let cell = |col: Option<usize>| -> String {
            col.and_then(|i| row.get(i))
                .map(|c| c.to_string().trim().to_string())
                .unwrap_or_default()
        };

        if cell(Some(id_col)) == wanted {
            let zip_city = format!("{} {}", cell(column("zip")), cell(column("city")));
            return Some(format!(
                "{}\n{}\n{}",
                cell(column("name")),
                cell(column("street")),
                zip_city.trim()
            ));
        }
    }

    None
}
