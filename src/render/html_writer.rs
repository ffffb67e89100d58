use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::Figure;
use crate::error::{ChartError, ChartResult};
use crate::render::{FigureWriter, figure_to_plotly};

pub const DEFAULT_PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Writes a standalone HTML page that draws the figure with plotly.js.
#[derive(Debug, Clone)]
pub struct HtmlFigureWriter {
    path: PathBuf,
    plotly_src: String,
}

impl HtmlFigureWriter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            plotly_src: DEFAULT_PLOTLY_SRC.to_owned(),
        }
    }

    /// Overrides the script URL, e.g. a vendored local copy.
    #[must_use]
    pub fn with_plotly_src(mut self, src: impl Into<String>) -> Self {
        self.plotly_src = src.into();
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full page text for `figure`.
    pub fn render_page(&self, figure: &Figure) -> ChartResult<String> {
        let spec = serde_json::to_string(&figure_to_plotly(figure)).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize plotly figure: {e}"))
        })?;
        // `</` inside a script block would end it early.
        let spec = spec.replace("</", "<\\/");
        let title = html_escape(figure.layout.title.as_deref().unwrap_or("Figure"));
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
             <script src=\"{src}\"></script>\n</head>\n<body>\n<div id=\"figure\"></div>\n\
             <script>\nconst spec = {spec};\nPlotly.newPlot(\"figure\", spec.data, spec.layout);\n\
             </script>\n</body>\n</html>\n",
            src = html_escape(&self.plotly_src),
        ))
    }
}

impl FigureWriter for HtmlFigureWriter {
    fn write(&mut self, figure: &Figure) -> ChartResult<()> {
        figure.validate()?;
        let page = self.render_page(figure)?;
        std::fs::write(&self.path, page).map_err(|source| ChartError::ArtifactWrite {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!(path = %self.path.display(), traces = figure.trace_count(), "wrote figure html");
        Ok(())
    }
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
