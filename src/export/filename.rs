use chrono::NaiveDateTime;

pub const FALLBACK_STEM: &str = "performance_plot";

/// Turn a chart title into a safe file stem: ASCII alphanumerics, `-` and `_`
/// are kept, whitespace runs become one `_`, everything else is dropped.
pub fn sanitize_filename(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_sep = false;

    for ch in title.trim().chars() {
        if ch.is_whitespace() {
            pending_sep = true;
            continue;
        }
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        }
    }

    let out = out.trim_matches(|c| c == '_' || c == '-').to_string();
    if out.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        out
    }
}

/// `<stem>_<YYYYmmdd_HHMMSS>.<ext>` for save dialogs.
pub fn default_export_name(title: &str, ext: &str, now: NaiveDateTime) -> String {
    format!("{}_{}.{ext}", sanitize_filename(title), now.format("%Y%m%d_%H%M%S"))
}

/// Same as [`default_export_name`] stamped with the local time.
pub fn export_name_now(title: &str, ext: &str) -> String {
    default_export_name(title, ext, chrono::Local::now().naive_local())
}
