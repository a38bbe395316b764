use std::fmt::{self, Write};

use crate::lookup::ReleaseRecord;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem; background: #0f172a; color: #e5e7eb; }
p { color: #9ca3af; }
form { margin: 1.5rem 0; padding: 1rem; background: #111827; border-radius: 0.5rem; }
form div { margin-bottom: 0.5rem; }
label { display: inline-block; margin-right: 0.5rem; }
input[type="date"], input[type="number"] { padding: 0.3rem; border: 1px solid #4b5563; border-radius: 0.25rem; background: #020617; color: #e5e7eb; }
input[type="submit"] { padding: 0.4rem 0.8rem; border: none; border-radius: 0.25rem; background: #22c55e; color: #022c22; font-weight: 600; cursor: pointer; }
table { border-collapse: collapse; width: 100%; margin-top: 1.5rem; background: #020617; }
th, td { padding: 0.5rem 0.75rem; border-bottom: 1px solid #1f2937; font-size: 0.9rem; text-align: left; }
th { background: #111827; }
a { color: #38bdf8; text-decoration: none; }
.error { color: #f97373; margin-top: 0.5rem; }
.summary { margin-top: 1rem; font-weight: 500; }
.chip { display: inline-block; padding: 0.1rem 0.4rem; border-radius: 999px; font-size: 0.75rem; background: #1d4ed8; margin-left: 0.5rem; }
"#;

/// HTML-escapes the wrapped text when displayed.
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#x27;")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Page<'a> {
    /// Echoed back into the date picker as submitted
    pub date_value: &'a str,
    pub start_year: i32,
    pub end_year: i32,
    pub current_year: i32,
    pub pretty_date: &'a str,
    pub banner: Option<String>,
    /// `None` when no search ran, as opposed to a search without hits
    pub results: Option<&'a [ReleaseRecord]>,
}

impl Page<'_> {
    pub fn render(&self) -> Result<String, fmt::Error> {
        let mut out = String::with_capacity(8 * 1024);
        out.write_str("<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n")?;
        out.write_str("  <title>On This Day in Music</title>\n  <style>")?;
        out.write_str(STYLE)?;
        out.write_str("</style>\n</head>\n<body>\n  <h1>On This Day in Music</h1>\n")?;
        out.write_str("  <p>Pick a date and a year range to see which releases MusicBrainz knows about on that month and day, year after year.</p>\n")?;
        self.write_form(&mut out)?;
        if let Some(results) = self.results {
            self.write_results(&mut out, results)?;
        }
        out.write_str("</body>\n</html>\n")?;
        Ok(out)
    }

    fn write_form(&self, out: &mut String) -> fmt::Result {
        out.write_str("  <form method=\"post\">\n")?;
        writeln!(
            out,
            "    <div><label for=\"date\">Date:</label><input type=\"date\" id=\"date\" name=\"date\" value=\"{}\" required></div>",
            Escaped(self.date_value)
        )?;
        writeln!(
            out,
            "    <div><label for=\"start_year\">Start year:</label><input type=\"number\" id=\"start_year\" name=\"start_year\" value=\"{}\" min=\"1900\" max=\"{}\">",
            self.start_year, self.current_year
        )?;
        writeln!(
            out,
            "      <label for=\"end_year\">End year:</label><input type=\"number\" id=\"end_year\" name=\"end_year\" value=\"{}\" min=\"1900\" max=\"{}\">",
            self.end_year, self.current_year
        )?;
        writeln!(
            out,
            "      <span class=\"chip\">Tip: keep ranges small (e.g. 1990–{})</span></div>",
            self.current_year
        )?;
        out.write_str("    <input type=\"submit\" value=\"Find releases\">\n")?;
        if let Some(banner) = &self.banner {
            writeln!(out, "    <div class=\"error\">{}</div>", Escaped(banner))?;
        }
        out.write_str("  </form>\n")
    }

    fn write_results(&self, out: &mut String, results: &[ReleaseRecord]) -> fmt::Result {
        writeln!(
            out,
            "  <div class=\"summary\">Found {} releases for {} across {}–{}.</div>",
            results.len(),
            Escaped(self.pretty_date),
            self.start_year,
            self.end_year
        )?;
        if results.is_empty() {
            return Ok(());
        }
        out.write_str("  <table>\n    <thead><tr><th>Year</th><th>Artist</th><th>Title</th><th>Date</th><th>Link</th></tr></thead>\n    <tbody>\n")?;
        for record in results {
            write!(
                out,
                "      <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
                record.year,
                Escaped(record.artist.as_deref().unwrap_or("Unknown artist")),
                Escaped(record.title.as_deref().unwrap_or_default()),
                Escaped(record.date.as_deref().unwrap_or("N/A")),
            )?;
            match &record.url {
                Some(url) => writeln!(
                    out,
                    "<td><a href=\"{}\" target=\"_blank\" rel=\"noopener\">View</a></td></tr>",
                    Escaped(url)
                )?,
                None => out.write_str("<td>&mdash;</td></tr>\n")?,
            }
        }
        out.write_str("    </tbody>\n  </table>\n")
    }
}
