// CSV/TSV import and result export

use std::io::Read;
use std::path::Path;

use assaymatch_align::model::{MatchDecision, Table, DECISION_COLUMNS};

use crate::error::IoError;
use crate::header_names;

pub fn import(path: &Path) -> Result<Table, IoError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter).map_err(|e| IoError::parse(path, e))
}

pub fn import_tsv(path: &Path) -> Result<Table, IoError> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content, b'\t').map_err(|e| IoError::parse(path, e))
}

const DELIMITERS: [u8; 4] = [b'\t', b';', b',', b'|'];

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.len())
        .unwrap_or(1)
}

/// Pick the delimiter that splits the header into the most columns and
/// agrees with it on the most sample lines. Assay descriptions often carry
/// `;` or `,` of their own ("Binding; rat brain"), so one line is never
/// trusted alone. Ties keep the earlier candidate in `DELIMITERS`.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).take(10).collect();
    let Some(header) = sample.first() else {
        return b',';
    };

    let mut best = (b',', 0usize);
    for delim in DELIMITERS {
        let width = field_count(header, delim);
        if width <= 1 {
            continue;
        }
        let agreeing = sample.iter().filter(|line| field_count(line, delim) == width).count();
        let score = agreeing * width;
        if score > best.1 {
            best = (delim, score);
        }
    }
    best.0
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let mut file = std::fs::File::open(path).map_err(|e| IoError::read(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| IoError::read(path, e))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Parse delimited text. The first non-blank record is the header; empty
/// fields become null cells. Blank lines are skipped, but a record of empty
/// fields (`,,`) is a row of nulls so it still gets a match decision.
pub fn import_from_string(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut table: Option<Table> = None;

    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| format!("line {}: {e}", line + 1))?;
        match table.as_mut() {
            None if record.iter().all(|f| f.trim().is_empty()) => continue,
            None => table = Some(Table::new(header_names(record.iter()))),
            Some(t) => t.push_row(
                record
                    .iter()
                    .map(|f| (!f.is_empty()).then(|| f.to_string()))
                    .collect(),
            ),
        }
    }

    table.ok_or_else(|| "file is empty (no header row)".to_string())
}

fn write_records<I>(path: &Path, header: &[&str], rows: I) -> Result<(), IoError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| IoError::write(path, e))?;

    writer.write_record(header).map_err(|e| IoError::write(path, e))?;
    for row in rows {
        writer.write_record(&row).map_err(|e| IoError::write(path, e))?;
    }

    writer.flush().map_err(|e| IoError::write(path, e))?;
    Ok(())
}

/// Write a table with its header. Null cells are written as empty fields.
pub fn export(table: &Table, path: &Path) -> Result<(), IoError> {
    let header: Vec<&str> = table.columns.iter().map(|c| c.as_str()).collect();
    let rows = table.rows.iter().map(|row| {
        (0..table.columns.len())
            .map(|c| row.get(c).unwrap_or_default().to_string())
            .collect()
    });
    write_records(path, &header, rows)
}

/// Write the audit log: query, matched text (empty when unmatched), score.
pub fn export_decisions(decisions: &[MatchDecision], path: &Path) -> Result<(), IoError> {
    let rows = decisions.iter().map(|d| {
        vec![
            d.query.clone(),
            d.matched.clone().unwrap_or_default(),
            d.score.to_string(),
        ]
    });
    write_records(path, &DECISION_COLUMNS, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Assay;Target;pChEMBL\nNaloxone binding;OPRM1;8.1\nD2 binding;DRD2;7.4\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "Assay,Target,pChEMBL\nNaloxone binding,OPRM1,8.1\nD2 binding,DRD2,7.4\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "Assay\tTarget\nNaloxone binding\tOPRM1\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "Assay;Notes;Target\n\"Binding, rat brain\";\"a, b\";OPRM1\nD2;\"x\";DRD2\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_import_header_and_nulls() {
        let table = import_from_string("id,desc\n1,alpha\n\n2,\n3\n", b',').unwrap();
        assert_eq!(table.columns, vec!["id".to_string(), "desc".to_string()]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.value(0, "desc"), Some("alpha"));
        assert_eq!(table.value(1, "desc"), None);
        assert_eq!(table.value(2, "id"), Some("3"));
        assert_eq!(table.value(2, "desc"), None);
    }

    #[test]
    fn test_sniff_comma_with_semicolons_in_descriptions() {
        let content = "Assay Description,Assay Number\n\
            \"Opioid binding; rat brain; 3H-DAMGO\",1\n\
            \"5-HT uptake; synaptosomes\",2\n\
            Dopamine D2 receptor binding,3\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_descriptions() {
        let content = "Assay Description;Assay Number\n\
            Binding, rat brain, 3H-DAMGO;1\n\
            Dopamine D2 receptor binding;2\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_import_keeps_all_empty_records() {
        let table = import_from_string("Assay Description,n\n,\nx,1\n,,\n", b',').unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].cells, vec![None, None]);
        assert_eq!(table.value(1, "Assay Description"), Some("x"));
        assert_eq!(table.rows[2].cells, vec![None, None]);
    }

    #[test]
    fn test_import_empty_is_error() {
        assert!(import_from_string("", b',').is_err());
        assert!(import_from_string("\n\n", b',').is_err());
    }

    #[test]
    fn test_windows_1252_fallback_and_bom() {
        let dir = tempdir().unwrap();
        let latin = dir.path().join("latin.csv");
        // "³H" in Windows-1252 is 0xB3 'H'
        fs::write(&latin, b"desc,n\n\xB3H Naloxone,1\n").unwrap();
        let table = import(&latin).unwrap();
        assert_eq!(table.value(0, "desc"), Some("³H Naloxone"));

        let bom = dir.path().join("bom.csv");
        fs::write(&bom, "\u{FEFF}desc,n\nx,1\n").unwrap();
        let table = import(&bom).unwrap();
        assert_eq!(table.columns[0], "desc");
    }

    #[test]
    fn test_export_table_and_decisions() {
        let dir = tempdir().unwrap();

        let mut table = Table::new(vec!["id".into(), "desc".into()]);
        table.push_row(vec![Some("1".into()), None]);
        let path = dir.path().join("aligned.csv");
        export(&table, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "id,desc\n1,\n");

        let decisions = vec![
            MatchDecision { query: "a, b".into(), matched: Some("a b".into()), score: 95 },
            MatchDecision { query: "zzz".into(), matched: None, score: 12 },
        ];
        let path = dir.path().join("scores.csv");
        export_decisions(&decisions, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("File2 Assay Description (clean),Matched File1 Assay (clean),Match Score")
        );
        assert_eq!(lines.next(), Some("\"a, b\",a b,95"));
        assert_eq!(lines.next(), Some("zzz,,12"));
    }
}
