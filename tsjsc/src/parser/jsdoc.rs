//! JSDoc block parsing.
//!
//! A block is split into free description text and `@tag value` pairs.
//! Tag values run until the next line that starts with `@`.

/// Parsed JSDoc block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsDoc {
    /// Text before the first tag, if any.
    pub description: Option<String>,
    /// Tags in source order.
    pub tags: Vec<JsDocTag>,
}

/// One `@name value` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsDocTag {
    pub name: String,
    pub value: String,
}

impl JsDoc {
    /// Parse the inner text of a `/** ... */` block.
    pub fn parse(raw: &str) -> Self {
        let mut description = Vec::new();
        let mut tags: Vec<(String, Vec<String>)> = Vec::new();

        for line in raw.lines() {
            let line = clean_line(line);
            if let Some(rest) = line.strip_prefix('@') {
                let (name, value) = match rest.find(char::is_whitespace) {
                    Some(split) => (&rest[..split], rest[split..].trim()),
                    None => (rest, ""),
                };
                tags.push((name.to_string(), vec![value.to_string()]));
            } else if let Some((_, values)) = tags.last_mut() {
                values.push(line.to_string());
            } else {
                description.push(line.to_string());
            }
        }

        let description = join_trimmed(&description);
        let tags = tags
            .into_iter()
            .map(|(name, values)| JsDocTag {
                name,
                value: join_trimmed(&values).unwrap_or_default(),
            })
            .collect();

        Self { description, tags }
    }

    /// Parse an optional raw block.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.map(Self::parse).unwrap_or_default()
    }

    /// Whether the block carries nothing.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.tags.is_empty()
    }

    /// Value of the last tag with this name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .rev()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }
}

fn clean_line(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix('*').map(str::trim).unwrap_or(line)
}

fn join_trimmed(lines: &[String]) -> Option<String> {
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
