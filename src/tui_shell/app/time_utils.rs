use std::sync::OnceLock;

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;

fn ts_ui_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[hour padding:zero]:[minute padding:zero]:[second padding:zero]Z",
        )
        .unwrap_or_default()
    })
}

pub(in crate::tui_shell) fn fmt_ts_ui(ts: &str) -> String {
    OffsetDateTime::parse(ts, &Rfc3339)
        .ok()
        .and_then(|dt| dt.format(ts_ui_format()).ok())
        .unwrap_or_else(|| ts.to_string())
}

pub(in crate::tui_shell) fn now_ts() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_timestamp_shows_clock_time() {
        assert_eq!(fmt_ts_ui("2026-01-25T13:04:05Z"), "13:04:05Z");
        assert_eq!(fmt_ts_ui("garbage"), "garbage");
    }
}
