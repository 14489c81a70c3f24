//! Fixed layout of the mirror spreadsheet: one sheet per collection, a
//! header row, and the local id in the last column (`Settings` is keyed by
//! its first column instead).

pub const MAX_ROWS: usize = 10_000;

pub const SHIFTS: &str = "Shifts";
pub const RIDES: &str = "Rides";
pub const EXPENSES: &str = "Expenses";
pub const VENDORS: &str = "Vendors";
pub const CONCEPTS: &str = "Concepts";
pub const WORKSHOPS: &str = "Workshops";
pub const SETTINGS: &str = "Settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetDef {
    pub name: &'static str,
    pub headers: &'static [&'static str],
}

pub static SHEETS: [SheetDef; 7] = [
    SheetDef {
        name: SHIFTS,
        headers: &[
            "Start",
            "End",
            "Km Start",
            "Km End",
            "Km Total",
            "Break Minutes",
            "Worked Minutes",
            "Notes",
            "ID",
        ],
    },
    SheetDef {
        name: RIDES,
        headers: &[
            "Date",
            "Time",
            "Fare",
            "Tip",
            "Total",
            "Payment",
            "Origin",
            "Destination",
            "Shift ID",
            "Notes",
            "ID",
        ],
    },
    SheetDef {
        name: EXPENSES,
        headers: &[
            "Date",
            "Concept",
            "Vendor",
            "Workshop",
            "Base",
            "Tax Rate",
            "Tax",
            "Discount",
            "Total",
            "Liters",
            "Tax ID",
            "Invoice",
            "Services",
            "Notes",
            "ID",
        ],
    },
    SheetDef {
        name: VENDORS,
        headers: &["Name", "Tax ID", "ID"],
    },
    SheetDef {
        name: CONCEPTS,
        headers: &["Name", "ID"],
    },
    SheetDef {
        name: WORKSHOPS,
        headers: &["Name", "Phone", "ID"],
    },
    SheetDef {
        name: SETTINGS,
        headers: &["Key", "Value"],
    },
];

impl SheetDef {
    /// Column holding the row identifier.
    pub fn id_column(&self) -> usize {
        if self.name == SETTINGS {
            0
        } else {
            self.headers.len() - 1
        }
    }

    pub fn last_column(&self) -> String {
        column_letter(self.headers.len() - 1)
    }

    /// `Sheet!A1:<last><MAX_ROWS>`: everything the mirror may ever write.
    pub fn full_range(&self) -> String {
        format!("{}!A1:{}{}", self.name, self.last_column(), MAX_ROWS)
    }

    pub fn header_range(&self) -> String {
        format!("{}!A1:{}1", self.name, self.last_column())
    }

    pub fn row_range(&self, row: usize) -> String {
        format!("{}!A{}:{}{}", self.name, row, self.last_column(), row)
    }

    /// Range used for appends; Sheets finds the end of the table itself.
    pub fn append_range(&self) -> String {
        format!("{}!A1", self.name)
    }

    pub fn header_row(&self) -> Vec<String> {
        self.headers.iter().map(|h| h.to_string()).collect()
    }
}

pub fn sheet(name: &str) -> Option<&'static SheetDef> {
    SHEETS.iter().find(|s| s.name == name)
}

pub fn sheet_names() -> Vec<&'static str> {
    SHEETS.iter().map(|s| s.name).collect()
}

/// 0-based column index to spreadsheet letters (0 → A, 26 → AA).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}
