//! Output formatting for CLI commands.
//!
//! Structured formats (JSON, YAML, template) serialize the API models as
//! they are. Table formats go through the [`TableRegistry`], which maps each
//! [`ResourceKind`] to its column headers; the rows come from the
//! [`Tabular`] implementation of the printed type.

use std::collections::HashMap;
use std::io::Write;
use std::sync::LazyLock;

use comfy_table::{Table, presets};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;
use crate::template::Template;

/// Printed instead of an empty table.
pub const NO_RESOURCES: &str = "No resources found.";

/// Every kind of resource the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// API health.
    Health,
    /// Client and server version.
    Version,
    /// Kubernetes cluster.
    Cluster,
    /// Project.
    Project,
    /// Tenant.
    Tenant,
    /// Postgres database.
    Postgres,
    /// S3 credentials.
    S3,
    /// Persistent volume.
    Volume,
    /// Audit trace.
    Audit,
    /// Cluster usage record.
    ClusterUsage,
}

/// Column headers of a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// Columns of the normal table.
    pub headers: &'static [&'static str],
    /// Columns of the wide table.
    pub wide_headers: &'static [&'static str],
}

impl TableLayout {
    /// Headers for the requested width.
    pub fn headers(&self, wide: bool) -> &'static [&'static str] {
        if wide { self.wide_headers } else { self.headers }
    }
}

/// A type that can be printed as table rows.
pub trait Tabular: Serialize {
    /// Which layout the rows belong to.
    const KIND: ResourceKind;

    /// Cells of one row, matching the headers of [`Self::KIND`].
    fn row(&self, wide: bool) -> Vec<String>;
}

static STANDARD: LazyLock<TableRegistry> = LazyLock::new(TableRegistry::build);

/// Table layouts by resource kind.
#[derive(Debug, Clone)]
pub struct TableRegistry {
    layouts: HashMap<ResourceKind, TableLayout>,
}

impl TableRegistry {
    /// The registry with every built-in layout.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    fn build() -> Self {
        let mut registry = Self {
            layouts: HashMap::new(),
        };
        registry.register(
            ResourceKind::Health,
            &["STATUS", "MESSAGE"],
            &["STATUS", "MESSAGE"],
        );
        registry.register(
            ResourceKind::Version,
            &["CLIENT", "SERVER"],
            &["CLIENT", "SERVER", "REVISION", "GIT SHA1", "BUILD DATE"],
        );
        registry.register(
            ResourceKind::Cluster,
            &[
                "ID", "TENANT", "PROJECT", "NAME", "PARTITION", "PURPOSE", "VERSION", "OPERATION",
                "PROGRESS", "API", "CONTROL", "NODES", "SYSTEM", "AGE",
            ],
            &[
                "ID", "TENANT", "PROJECT", "NAME", "PARTITION", "PURPOSE", "VERSION", "OPERATION",
                "PROGRESS", "API", "CONTROL", "NODES", "SYSTEM", "AGE", "WORKERS", "DESCRIPTION",
            ],
        );
        registry.register(
            ResourceKind::Project,
            &["ID", "NAME", "DESCRIPTION", "TENANT"],
            &["ID", "NAME", "DESCRIPTION", "TENANT", "CLUSTER QUOTA"],
        );
        registry.register(
            ResourceKind::Tenant,
            &["ID", "NAME", "DESCRIPTION"],
            &["ID", "NAME", "DESCRIPTION"],
        );
        registry.register(
            ResourceKind::Postgres,
            &[
                "ID", "DESCRIPTION", "PARTITION", "VERSION", "CPU", "STORAGE", "INSTANCES",
                "STATUS", "AGE",
            ],
            &[
                "ID", "DESCRIPTION", "PARTITION", "VERSION", "CPU", "STORAGE", "INSTANCES",
                "STATUS", "AGE", "TENANT", "PROJECT",
            ],
        );
        registry.register(
            ResourceKind::S3,
            &["ID", "TENANT", "PROJECT", "NAME", "PARTITION"],
            &["ID", "TENANT", "PROJECT", "NAME", "PARTITION", "ENDPOINT", "ACCESS KEY"],
        );
        registry.register(
            ResourceKind::Volume,
            &["ID", "NAME", "SIZE", "USAGE", "STATE", "PROJECT", "PARTITION"],
            &[
                "ID", "NAME", "SIZE", "USAGE", "STATE", "PROJECT", "PARTITION", "STORAGE CLASS",
                "ATTACHED TO",
            ],
        );
        registry.register(
            ResourceKind::Audit,
            &["TIME", "REQUEST ID", "PHASE", "USER", "METHOD", "PATH", "CODE"],
            &["TIME", "REQUEST ID", "PHASE", "USER", "TENANT", "METHOD", "PATH", "CODE", "ERROR"],
        );
        registry.register(
            ResourceKind::ClusterUsage,
            &["TENANT", "PROJECT", "NAME", "PARTITION", "LIFETIME"],
            &["TENANT", "PROJECT", "CLUSTER ID", "NAME", "PARTITION", "START", "END", "LIFETIME"],
        );
        registry
    }

    fn register(
        &mut self,
        kind: ResourceKind,
        headers: &'static [&'static str],
        wide_headers: &'static [&'static str],
    ) {
        self.layouts.insert(kind, TableLayout { headers, wide_headers });
    }

    /// Layout of a resource kind.
    pub fn layout(&self, kind: ResourceKind) -> Option<&TableLayout> {
        self.layouts.get(&kind)
    }

    /// Render items as a borderless table.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind has no layout or a row does not match
    /// the headers.
    pub fn render<T: Tabular>(&self, items: &[T], wide: bool) -> Result<String, CliError> {
        if items.is_empty() {
            return Ok(NO_RESOURCES.to_string());
        }

        let layout = self
            .layout(T::KIND)
            .ok_or_else(|| CliError::Format(format!("no table layout for {:?}", T::KIND)))?;
        let headers = layout.headers(wide);

        let mut table = Table::new();
        table.load_preset(presets::NOTHING).set_header(headers.to_vec());

        for item in items {
            let row = item.row(wide);
            if row.len() != headers.len() {
                return Err(CliError::Format(format!(
                    "{:?} row has {} cells, expected {}",
                    T::KIND,
                    row.len(),
                    headers.len()
                )));
            }
            table.add_row(row);
        }

        Ok(table.to_string())
    }
}

/// Output formatter for all formats.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
    template: Option<Template>,
}

impl OutputFormat {
    /// Create a new output formatter.
    ///
    /// # Errors
    ///
    /// Returns an error if the template format is selected without a valid
    /// template.
    pub fn new(format: Format, template: Option<&str>) -> Result<Self, CliError> {
        let template = match (format, template) {
            (Format::Template, None) => {
                return Err(CliError::InvalidArgument(
                    "--output template requires --template".to_string(),
                ));
            }
            (Format::Template, Some(source)) => Some(Template::parse(source)?),
            _ => None,
        };
        Ok(Self { format, template })
    }

    /// Get the current format.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Write a list of items.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_list<W, T>(&self, writer: &mut W, items: &[T]) -> Result<(), CliError>
    where
        W: Write,
        T: Tabular,
    {
        match self.format {
            Format::Table | Format::Wide => {
                let table = TableRegistry::standard().render(items, self.is_wide())?;
                writeln!(writer, "{table}")?;
            }
            Format::Json => write_json(writer, items)?,
            Format::Yaml => serde_yaml::to_writer(&mut *writer, items)?,
            Format::Template => {
                for item in items {
                    self.write_template(writer, item)?;
                }
            }
        }
        Ok(())
    }

    /// Write a single item as a one-row table or as a structured document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_single<W, T>(&self, writer: &mut W, item: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Tabular,
    {
        match self.format {
            Format::Table | Format::Wide => {
                self.write_list(writer, std::slice::from_ref(item))
            }
            _ => self.write_document(writer, item),
        }
    }

    /// Write a single item in detail. Table formats show the full item as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_detail<W, T>(&self, writer: &mut W, item: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize,
    {
        match self.format {
            Format::Table | Format::Wide => {
                serde_yaml::to_writer(&mut *writer, item)?;
                Ok(())
            }
            _ => self.write_document(writer, item),
        }
    }

    fn write_document<W, T>(&self, writer: &mut W, item: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize,
    {
        match self.format {
            Format::Json => write_json(writer, item),
            Format::Template => self.write_template(writer, item),
            Format::Yaml | Format::Table | Format::Wide => {
                serde_yaml::to_writer(&mut *writer, item)?;
                Ok(())
            }
        }
    }

    fn write_template<W, T>(&self, writer: &mut W, item: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize,
    {
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| CliError::InvalidArgument("no template given".to_string()))?;
        writeln!(writer, "{}", template.render(item)?)?;
        Ok(())
    }

    fn is_wide(&self) -> bool {
        matches!(self.format, Format::Wide)
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            format: Format::Table,
            template: None,
        }
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Cell text for an optional value. Absent values are empty cells.
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Human-readable binary size: `512B`, `1.5Ki`, `10Gi`.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let text = format!("{value:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}{}", UNITS[unit])
}

/// Compact duration: `45s`, `3h 20m`, `2d 4h`.
pub fn human_duration(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = seconds % 86_400 / 3_600;
    let minutes = seconds % 3_600 / 60;
    match (days, hours, minutes) {
        (0, 0, 0) => format!("{seconds}s"),
        (0, 0, m) => format!("{m}m"),
        (0, h, m) => format!("{h}h {m}m"),
        (d, h, _) => format!("{d}d {h}h"),
    }
}
