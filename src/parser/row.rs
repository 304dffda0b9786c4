/// One data row keyed by its table's header text.
#[derive(Debug, Clone)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    /// Pair `cells` with `headers`. Rows shorter than the header are
    /// malformed and yield `None`; extra trailing cells are dropped.
    pub fn from_cells(headers: &[String], cells: &[Option<String>]) -> Option<Self> {
        if cells.len() < headers.len() {
            return None;
        }
        let cells = headers
            .iter()
            .zip(cells)
            .map(|(h, c)| (h.clone(), c.clone().unwrap_or_default()))
            .collect();
        Some(RawRow { cells })
    }

    /// Cell under `column`, matched case-insensitively and with runs of
    /// whitespace in the header treated as one space ("ATTACK\nRATINGS").
    /// When a header repeats, the rightmost column wins.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .rev()
            .find(|(header, _)| header_matches(header, column))
            .map(|(_, value)| value.as_str())
    }

    /// Like [`RawRow::get`], with a missing column read as an empty cell.
    pub fn cell(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }
}

fn header_matches(header: &str, column: &str) -> bool {
    let mut words = header.split_whitespace();
    let mut wanted = column.split_whitespace();
    loop {
        match (words.next(), wanted.next()) {
            (Some(a), Some(b)) if a.eq_ignore_ascii_case(b) => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}
