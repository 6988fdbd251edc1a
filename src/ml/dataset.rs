use crate::utils::error::{MlopsError, Result};
use ndarray::{Array1, Array2};

/// Numeric table loaded from CSV. Every cell must be a number.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
            return Err(MlopsError::DimensionMismatch {
                expected: format!("{} columns", headers.len()),
                actual: format!("{} columns in row {}", row.len(), i + 1),
            });
        }
        Ok(Self { headers, rows })
    }

    /// 讀取 CSV，自動判斷 `,` 或 `;` 分隔 (UCI 原始檔使用分號)
    pub fn from_csv_bytes(data: &[u8]) -> Result<Self> {
        let first_line = data.split(|b| *b == b'\n').next().unwrap_or_default();
        let delimiter = if !first_line.contains(&b',') && first_line.contains(&b';') {
            b';'
        } else {
            b','
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let row = record
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    cell.parse::<f64>().map_err(|_| MlopsError::ProcessingError {
                        message: format!(
                            "Non-numeric value '{}' in column '{}' at row {}",
                            cell,
                            headers.get(col).map(String::as_str).unwrap_or("?"),
                            line + 1
                        ),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(f64::to_string))?;
        }
        writer.into_inner().map_err(|e| MlopsError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Same columns, different rows.
    pub fn with_rows(&self, rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(self.headers.clone(), rows)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| MlopsError::SchemaValidationError {
                message: format!("Column '{}' not found", name),
            })
    }

    pub fn column(&self, name: &str) -> Result<Array1<f64>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Gather `columns` (in the given order) into an `n × k` matrix.
    pub fn select(&self, columns: &[String]) -> Result<Array2<f64>> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<usize>>>()?;

        Ok(Array2::from_shape_fn((self.rows.len(), indices.len()), |(i, j)| {
            self.rows[i][indices[j]]
        }))
    }

    /// Every column except `target`, in file order.
    pub fn feature_columns(&self, target: &str) -> Result<Vec<String>> {
        self.column_index(target)?;
        Ok(self.headers.iter().filter(|h| *h != target).cloned().collect())
    }
}
