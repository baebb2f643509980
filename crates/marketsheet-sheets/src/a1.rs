//! A1 표기 범위 계산.

/// 열 번호(0부터)를 열 문자로 변환합니다 (0 → A, 25 → Z, 26 → AA).
pub fn column_letter(index: u32) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// 단일 셀 주소(`A14`, `$B$3`)를 (열 번호(0부터), 행 번호(1부터))로 변환합니다.
///
/// 범위나 시트 이름이 붙은 주소는 `None`.
pub fn parse_cell(a1: &str) -> Option<(u32, u32)> {
    let cell = a1.trim().replace('$', "");
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut column: u32 = 0;
    for c in letters.chars() {
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        column = column.checked_mul(26)?.checked_add(digit)?;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((column - 1, row))
}

/// 시트 내 기록 위치.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    /// 대상 시트 이름 (`None`이면 첫 번째 시트)
    pub sheet_name: Option<String>,
    /// 데이터 시작 행 (1부터, 1행은 헤더)
    pub first_data_row: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            sheet_name: None,
            first_data_row: 2,
        }
    }
}

impl SheetLayout {
    /// 행 수와 열 수에 딱 맞는 데이터 범위 (예: 11행 6열 → `A2:F12`).
    pub fn data_range(&self, rows: usize, columns: usize) -> String {
        let last_row = self.first_data_row as usize + rows.max(1) - 1;
        let last_col = column_letter(columns.max(1) as u32 - 1);
        self.qualify(&format!("A{}:{}{}", self.first_data_row, last_col, last_row))
    }

    /// 셀이 `data_range(rows, columns)` 범위 안에 있는지 여부.
    ///
    /// 해석할 수 없는 주소는 겹치지 않는 것으로 봅니다.
    pub fn data_contains(&self, rows: usize, columns: usize, cell: &str) -> bool {
        let Some((column, row)) = parse_cell(cell) else {
            return false;
        };
        let first = self.first_data_row as usize;
        let last = first + rows.max(1) - 1;
        (column as usize) < columns.max(1) && (first..=last).contains(&(row as usize))
    }

    /// 시트 이름이 설정되어 있으면 `'시트'!A1` 형식으로 한정합니다.
    pub fn qualify(&self, a1: &str) -> String {
        match &self.sheet_name {
            Some(name) => format!("'{}'!{}", name.replace('\'', "''"), a1),
            None => a1.to_string(),
        }
    }
}
