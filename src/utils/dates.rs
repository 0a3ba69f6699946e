// ============================================================================
// DATES - Fechas de cupones y ofertas
// ============================================================================
// Los formularios entregan `YYYY-MM-DD`; el backend guarda ISO 8601.
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};

/// Parsear una fecha de formulario (`YYYY-MM-DD`) o ISO 8601 completo
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Fecha ISO para el envío (`2025-01-31T00:00:00.000Z`)
pub fn to_iso_string(raw: &str) -> Option<String> {
    parse_date(raw).map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

/// Valor para `<input type="date">` al editar
pub fn to_input_value(raw: &str) -> String {
    parse_date(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Fecha legible en tarjetas y tablas
pub fn format_display(raw: &str) -> String {
    parse_date(raw)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_form_and_iso_dates() {
        assert!(parse_date("2025-03-01").is_some());
        assert!(parse_date("2025-03-01T10:00:00.000Z").is_some());
        assert!(parse_date("03/01/2025").is_none());
        assert!(parse_date("  ").is_none());
    }

    #[test]
    fn formats_for_backend_and_inputs() {
        assert_eq!(to_iso_string("2025-03-01").as_deref(), Some("2025-03-01T00:00:00.000Z"));
        assert_eq!(to_input_value("2025-03-01T10:00:00.000Z"), "2025-03-01");
        assert_eq!(format_display("2025-03-01"), "Mar 01, 2025");
        assert_eq!(format_display("not a date"), "-");
    }
}
