use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::aggregate::OverallStat;
use crate::align::AlignedCategory;
use crate::percentage::CategoryPercentages;

pub const TIME_UNIT: &str = "ns";

pub const HEADERS: [&str; 5] = [
    "Names",
    "Encode",
    "Encode Avg Time(ns)",
    "Decode",
    "Decode Avg Time(ns)",
];

const PADDING: usize = 8;
const NOT_AVAILABLE: &str = "N/A";

/// One table line. Absent cells print as `N/A`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub name: String,
    pub encode_percentage: Option<f64>,
    pub encode_time: Option<f64>,
    pub decode_percentage: Option<f64>,
    pub decode_time: Option<f64>,
}

impl TableRow {
    pub fn from_stat(stat: &OverallStat) -> Self {
        TableRow {
            name: stat.algorithm.clone(),
            encode_percentage: stat.encode.map(|m| m.percentage),
            encode_time: stat.encode.map(|m| m.cpu_time),
            decode_percentage: stat.decode.map(|m| m.percentage),
            decode_time: stat.decode.map(|m| m.cpu_time),
        }
    }

    fn cells(&self) -> [String; 5] {
        [
            self.name.clone(),
            percent(self.encode_percentage),
            time(self.encode_time),
            percent(self.decode_percentage),
            time(self.decode_time),
        ]
    }
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_owned(), |v| format!("{:.2}%", v * 100.0))
}

fn time(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_owned(), |v| format!("{v:.0}"))
}

pub fn overall_rows(stats: &[OverallStat]) -> Vec<TableRow> {
    stats.iter().map(TableRow::from_stat).collect()
}

/// Rows of a single category: its percentages next to the raw cputimes.
pub fn category_rows(
    aligned: &AlignedCategory,
    percentages: &CategoryPercentages,
) -> Vec<TableRow> {
    aligned
        .pairs()
        .enumerate()
        .map(|(i, (encode, decode))| TableRow {
            name: encode.algorithm.clone(),
            encode_percentage: percentages.encode.as_slice().get(i).copied(),
            encode_time: Some(encode.cpu_time),
            decode_percentage: percentages.decode.as_slice().get(i).copied(),
            decode_time: Some(decode.cpu_time),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    header: &'static str,
    name: &'static str,
    value: &'static str,
    reset: &'static str,
}

impl Palette {
    pub const PLAIN: Palette = Palette {
        header: "",
        name: "",
        value: "",
        reset: "",
    };

    pub const ANSI: Palette = Palette {
        header: "\x1b[0;34m",
        name: "\x1b[32m",
        value: "\x1b[33m",
        reset: "\x1b[0m",
    };
}

/// Every column is as wide as its widest cell or header plus padding; the
/// last column is not padded.
fn column_widths(rows: &[[String; 5]]) -> [usize; 5] {
    let mut widths = HEADERS.map(|header| header.width());
    for cells in rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.width());
        }
    }
    for width in &mut widths[..HEADERS.len() - 1] {
        *width += PADDING;
    }
    widths
}

fn write_line(
    output: &mut dyn Write,
    cells: &[&str],
    widths: &[usize; 5],
    colors: [&str; 5],
    reset: &str,
) -> io::Result<()> {
    let last = cells.len() - 1;
    for (i, cell) in cells.iter().enumerate() {
        output.write_all(colors[i].as_bytes())?;
        output.write_all(cell.as_bytes())?;
        if i != last {
            let fill = widths[i].saturating_sub(cell.width());
            write!(output, "{:fill$}", "")?;
        }
        output.write_all(reset.as_bytes())?;
    }
    output.write_all(b"\n")
}

/// Writes `rows` as a column-aligned table framed by dash rules, optionally
/// preceded by a title line.
pub fn write_table(
    output: &mut dyn Write,
    title: Option<&str>,
    rows: &[TableRow],
    palette: &Palette,
) -> io::Result<()> {
    let cells: Vec<[String; 5]> = rows.iter().map(TableRow::cells).collect();
    let widths = column_widths(&cells);
    let rule = "-".repeat(widths.iter().sum());

    output.write_all(b"\n")?;
    if let Some(title) = title {
        writeln!(output, "{title}")?;
    }
    writeln!(output, "{rule}")?;
    write_line(output, &HEADERS, &widths, [palette.header; 5], palette.reset)?;
    writeln!(output, "{rule}")?;
    let value = palette.value;
    for row in &cells {
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        write_line(
            output,
            &row,
            &widths,
            [palette.name, value, value, value, value],
            palette.reset,
        )?;
    }
    writeln!(output, "{rule}")?;
    Ok(())
}
