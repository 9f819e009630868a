//! Quote-aware splitting of delimited lines.
//!
//! Cells keep their surrounding quotes when a line is split;
//! [`CsvTokenizer::get_field`] strips them on the way out and
//! [`CsvTokenizer::set_field`] re-applies them when the new value needs
//! protection. A quoted cell may contain the delimiter and line breaks,
//! and an unterminated quote runs to the end of the line.

/// Delimiter and quote strings for one delimited record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDefinition {
    delimiter: String,
    quote: String,
}

impl CsvDefinition {
    pub fn new(delimiter: impl Into<String>, quote: impl Into<String>) -> Self {
        CsvDefinition {
            delimiter: delimiter.into(),
            quote: quote.into(),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    fn has_quote(&self) -> bool {
        !self.quote.is_empty()
    }
}

/// Splits and rebuilds delimited lines according to one [`CsvDefinition`].
#[derive(Debug, Clone)]
pub struct CsvTokenizer {
    def: CsvDefinition,
}

impl CsvTokenizer {
    pub fn new(def: CsvDefinition) -> Self {
        CsvTokenizer { def }
    }

    pub fn definition(&self) -> &CsvDefinition {
        &self.def
    }

    /// Splits `line` into cells, padded with empty cells so that index
    /// `min_index` always exists. Quoted cells keep their quotes.
    ///
    /// Returns `None` when the definition has no delimiter, since there
    /// is no way to split without one.
    pub fn split(&self, line: &str, min_index: usize) -> Option<Vec<String>> {
        if self.def.delimiter.is_empty() {
            return None;
        }
        let toks = tokens(line, &self.def.delimiter);
        let mut fields: Vec<String> = Vec::new();
        let mut keep = true;
        let mut building = false;
        let mut buffer = String::new();
        for tok in &toks {
            if building {
                buffer.push_str(tok);
                if tok.ends_with(&self.def.quote) {
                    fields.push(std::mem::take(&mut buffer));
                    building = false;
                    keep = false;
                }
            } else if *tok == self.def.delimiter {
                if keep {
                    fields.push(String::new());
                }
                keep = true;
            } else if self.def.has_quote() && is_quote_opener(tok, &self.def.quote) {
                building = true;
                buffer.push_str(tok);
            } else {
                fields.push((*tok).to_string());
                keep = false;
            }
        }
        if building {
            // Unterminated quote runs to the end of the line.
            fields.push(buffer);
        } else if keep && !toks.is_empty() {
            fields.push(String::new());
        }
        while fields.len() <= min_index {
            fields.push(String::new());
        }
        Some(fields)
    }

    /// The number of cells on `line`.
    pub fn field_count(&self, line: &str) -> usize {
        self.split(line, 0).map_or(0, |fields| fields.len())
    }

    /// Reads cell `index` of `line` with quotes stripped.
    pub fn get_field(&self, index: usize, line: &str) -> Option<String> {
        let fields = self.split(line, index)?;
        fields.get(index).map(|f| self.strip_quotes(f))
    }

    /// Replaces cell `index` of `line`, quoting the new value if it
    /// contains the delimiter, a line break, or starts with the quote.
    pub fn set_field(&self, index: usize, line: &str, value: &str) -> String {
        let mut fields = self
            .split(line, index)
            .unwrap_or_else(|| vec![String::new(); index + 1]);
        while fields.len() <= index {
            fields.push(String::new());
        }
        fields[index] = self.format_field(value);
        fields.join(&self.def.delimiter)
    }

    fn format_field(&self, value: &str) -> String {
        if self.def.has_quote()
            && (value.contains(&self.def.delimiter)
                || value.starts_with(&self.def.quote)
                || value.contains('\n')
                || value.contains('\r'))
        {
            format!("{q}{value}{q}", q = self.def.quote)
        } else {
            value.to_string()
        }
    }

    fn strip_quotes(&self, field: &str) -> String {
        let q = &self.def.quote;
        if !q.is_empty() && field.starts_with(q.as_str()) && field.ends_with(q.as_str()) {
            if field.len() >= 2 * q.len() {
                field[q.len()..field.len() - q.len()].to_string()
            } else {
                // The cell is a bare quote.
                String::new()
            }
        } else {
            field.to_string()
        }
    }
}

// A token that starts with the quote opens a quoted cell unless it also
// closes it; a token that is nothing but the quote always opens one.
fn is_quote_opener(tok: &str, quote: &str) -> bool {
    tok.starts_with(quote) && (!tok.ends_with(quote) || tok.len() == quote.len())
}

// Alternating content and delimiter occurrences, in order.
fn tokens<'a>(line: &'a str, delim: &str) -> Vec<&'a str> {
    let mut toks = Vec::new();
    let mut rest = line;
    while let Some(i) = rest.find(delim) {
        if i > 0 {
            toks.push(&rest[..i]);
        }
        toks.push(&rest[i..i + delim.len()]);
        rest = &rest[i + delim.len()..];
    }
    if !rest.is_empty() {
        toks.push(rest);
    }
    toks
}
