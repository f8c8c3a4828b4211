//! Request orchestration: decode, translate, count, fetch, render,
//! assemble.

use crate::decode::{self, DecodeLimits, RawParams};
use crate::errors::DataTablesError;
use crate::filtering::{build_search_filter, build_sort_keys};
use crate::models::TableResponse;
use crate::pagination::PageWindow;
use crate::registry::{ColumnRegistry, RegistryError};
use crate::render::{RowCustomizer, render_row};
use crate::source::DataSource;

/// How `recordsTotal` is computed. The upstream implementations of this
/// protocol disagree (one always echoes the filtered count, one counts
/// independently), so the choice is explicit configuration rather than a
/// guessed default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountMode {
    /// Count the unfiltered table independently of the filtered count.
    #[default]
    Independent,
    /// Report the filtered count for both fields (single count query).
    Collapsed,
}

/// One configured table endpoint: a registry, a data source, and the
/// processing policy. Built once at startup, then shared immutably across
/// requests (typically behind an `Arc` in Axum state).
pub struct DataTable<S> {
    registry: ColumnRegistry,
    source: S,
    limits: DecodeLimits,
    case_insensitive: bool,
    count_mode: CountMode,
    customizer: Option<Box<dyn RowCustomizer>>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for DataTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("registry", &self.registry)
            .field("source", &self.source)
            .field("limits", &self.limits)
            .field("case_insensitive", &self.case_insensitive)
            .field("count_mode", &self.count_mode)
            .field("customizer", &self.customizer.as_ref().map(|_| "..."))
            .finish()
    }
}

impl<S: DataSource> DataTable<S> {
    #[must_use]
    pub fn builder(registry: ColumnRegistry, source: S) -> DataTableBuilder<S> {
        DataTableBuilder {
            registry,
            source,
            limits: DecodeLimits::default(),
            case_insensitive: true,
            count_mode: CountMode::default(),
            customizer: None,
            schema: None,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    /// Processes one request: the full decode → translate → count →
    /// fetch → render → assemble pipeline. Stateless; nothing survives
    /// beyond the returned envelope.
    ///
    /// # Errors
    ///
    /// Structural and referential decode failures reject the request
    /// before any store access; store and rendering-integrity failures
    /// propagate unrecovered.
    pub async fn process(&self, params: &RawParams) -> Result<TableResponse, DataTablesError> {
        let request = decode::decode_request(params, &self.registry, self.limits)?;
        tracing::debug!(
            draw = request.draw,
            columns = request.columns.len(),
            orders = request.orders.len(),
            search = request.search.is_some(),
            "decoded table request"
        );

        let filter =
            build_search_filter(&self.registry, request.search.as_deref(), self.case_insensitive);
        let sort = build_sort_keys(&self.registry, &request.orders);

        let records_filtered = self.source.count(filter.as_ref()).await?;
        let records_total = match (self.count_mode, filter.as_ref()) {
            (CountMode::Independent, Some(_)) => self.source.count(None).await?,
            // without a filter both counts coincide; skip the second query
            _ => records_filtered,
        };

        let window = PageWindow::clamp(request.start, request.length, records_filtered);
        let rows = self
            .source
            .fetch(filter.as_ref(), &sort, window.offset(), window.limit())
            .await?;

        let mut data = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut rendered = render_row(&self.registry, row)?;
            if let Some(customizer) = &self.customizer {
                customizer.customize(&mut rendered, row);
            }
            data.push(rendered);
        }

        Ok(TableResponse {
            draw: request.draw,
            records_total,
            records_filtered,
            data,
        })
    }
}

/// Builder for [`DataTable`]. Validation happens in [`build`](Self::build)
/// so a misconfigured endpoint fails at startup, not per request.
pub struct DataTableBuilder<S> {
    registry: ColumnRegistry,
    source: S,
    limits: DecodeLimits,
    case_insensitive: bool,
    count_mode: CountMode,
    customizer: Option<Box<dyn RowCustomizer>>,
    schema: Option<Vec<String>>,
}

impl<S: DataSource> DataTableBuilder<S> {
    /// Bound on the column slots scanned per request (default 30).
    #[must_use]
    pub fn max_columns(mut self, max_columns: usize) -> Self {
        self.limits = DecodeLimits { max_columns };
        self
    }

    /// Switch prefix and label matching to exact case.
    #[must_use]
    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }

    #[must_use]
    pub fn count_mode(mut self, mode: CountMode) -> Self {
        self.count_mode = mode;
        self
    }

    /// Install a per-row customization hook.
    #[must_use]
    pub fn customize(mut self, customizer: impl RowCustomizer + 'static) -> Self {
        self.customizer = Some(Box::new(customizer));
        self
    }

    /// Backing schema column names to validate the registry against.
    #[must_use]
    pub fn schema<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.schema = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Finishes the endpoint, validating the registry against the backing
    /// schema when one was supplied.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] if a declared field has no
    /// backing column.
    pub fn build(self) -> Result<DataTable<S>, RegistryError> {
        if let Some(schema) = &self.schema {
            let columns: Vec<&str> = schema.iter().map(String::as_str).collect();
            self.registry.validate_schema(&columns)?;
        }
        Ok(DataTable {
            registry: self.registry,
            source: self.source,
            limits: self.limits,
            case_insensitive: self.case_insensitive,
            count_mode: self.count_mode,
            customizer: self.customizer,
        })
    }
}
