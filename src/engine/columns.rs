use crate::error::AnalysisError;
use crate::models::{PunchRecord, RawTable};

/// Canonical punch columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    EmployeeCode,
    FirstName,
    LastName,
    InTime,
    OutTime,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::EmployeeCode,
        Column::FirstName,
        Column::LastName,
        Column::InTime,
        Column::OutTime,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::EmployeeCode => "EECode",
            Column::FirstName => "Firstname",
            Column::LastName => "Lastname",
            Column::InTime => "InPunchTime",
            Column::OutTime => "OutPunchTime",
        }
    }

    /// Accepted spellings, tried in order when the canonical header is absent
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::EmployeeCode => &[
                "EE Code",
                "EECODE",
                "eecode",
                "ee_code",
                "EmployeeCode",
                "Employee Code",
                "employee_code",
                "EmployeeID",
                "Employee ID",
                "employee_id",
                "EmpCode",
                "Emp Code",
            ],
            Column::FirstName => &[
                "FirstName",
                "First Name",
                "FIRSTNAME",
                "firstname",
                "first_name",
                "First",
            ],
            Column::LastName => &[
                "LastName",
                "Last Name",
                "LASTNAME",
                "lastname",
                "last_name",
                "Last",
            ],
            Column::InTime => &[
                "In Punch Time",
                "InPunch",
                "In Punch",
                "INPUNCHTIME",
                "inpunchtime",
                "in_punch_time",
                "Punch In",
                "PunchIn",
                "In Time",
                "Clock In",
            ],
            Column::OutTime => &[
                "Out Punch Time",
                "OutPunch",
                "Out Punch",
                "OUTPUNCHTIME",
                "outpunchtime",
                "out_punch_time",
                "Punch Out",
                "PunchOut",
                "Out Time",
                "Clock Out",
            ],
        }
    }
}

/// A table whose headers have been mapped onto the canonical columns
#[derive(Debug, Clone)]
pub struct PunchTable {
    table: RawTable,
    positions: [usize; 5],
}

impl PunchTable {
    pub fn headers(&self) -> &[String] {
        &self.table.headers
    }

    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    fn value(&self, row: usize, column: Column) -> &str {
        let position = self.positions[column as usize];
        self.table.cell(row, position).trim()
    }

    /// Rows as punch records, in input order
    pub fn records(&self) -> impl Iterator<Item = PunchRecord> + '_ {
        (0..self.len()).map(move |row| PunchRecord {
            employee_code: self.value(row, Column::EmployeeCode).to_string(),
            first_name: self.value(row, Column::FirstName).to_string(),
            last_name: self.value(row, Column::LastName).to_string(),
            in_time: self.value(row, Column::InTime).to_string(),
            out_time: self.value(row, Column::OutTime).to_string(),
        })
    }
}

/// Rename alias headers to their canonical spelling and check every column is present
pub fn normalize(mut table: RawTable) -> Result<PunchTable, AnalysisError> {
    let mut positions = [usize::MAX; 5];
    let mut missing = Vec::new();

    for column in Column::ALL {
        let found = table
            .headers
            .iter()
            .position(|h| h == column.header())
            .or_else(|| {
                column
                    .aliases()
                    .iter()
                    .find_map(|alias| table.headers.iter().position(|h| h == alias))
            });

        match found {
            Some(index) => {
                table.headers[index] = column.header().to_string();
                positions[column as usize] = index;
            }
            None => missing.push(column.header().to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(AnalysisError::Schema {
            missing,
            found: table.headers,
        });
    }

    Ok(PunchTable { table, positions })
}
