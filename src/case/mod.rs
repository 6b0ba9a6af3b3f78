//! Case recorder: turns a committed sample into IDV bundles, an image script,
//! quicklook crops and a case notebook.

pub mod naming;
pub mod notebook;
pub mod quicklook;
pub mod snapshot;
pub mod template;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, Timelike};

use crate::config::CaseConfig;
use crate::constants::{case as defaults, output};
use crate::error::{ClickHistError, Result};
use crate::grid::Dimensions;
use crate::pick::{ActionDispatcher, CaseAction, DispatchContext};
use crate::session::{PointSummary, Session};
use notebook::NotebookContent;
use quicklook::QuicklookSource;
use template::BundleWindow;

/// Paths written for one case
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseArtifacts {
    pub common_name: String,
    pub bundles: Vec<PathBuf>,
    pub script: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub quicklooks: Vec<PathBuf>,
    /// `None` when the notebook already existed and was left alone
    pub notebook: Option<PathBuf>,
}

/// The default [`CaseAction`]
pub struct CaseRecorder {
    config: CaseConfig,
    dims: Dimensions,
    x_name: String,
    y_name: String,
    last: Option<CaseArtifacts>,
}

impl CaseRecorder {
    pub fn new(config: CaseConfig, dims: Dimensions, x_name: &str, y_name: &str) -> Self {
        Self {
            config,
            dims,
            x_name: x_name.to_string(),
            y_name: y_name.to_string(),
            last: None,
        }
    }

    /// Recorder for the grid, axis names and case settings of `session`
    pub fn for_session(session: &Session) -> Self {
        Self::new(
            session.config().case.clone(),
            session.dataset().dims().clone(),
            &session.x_axis().config.name,
            &session.y_axis().config.name,
        )
    }

    fn out_dir(&self, sub: &str) -> PathBuf {
        self.config.output_dir.join(sub)
    }

    /// Where the display leaves the most recent histogram snapshot
    pub fn snapshot_staging_path(config: &CaseConfig) -> PathBuf {
        config.output_dir.join(output::TMP_DIR).join("mostRecentCH.png")
    }

    pub fn last_case(&self) -> Option<&CaseArtifacts> {
        self.last.as_ref()
    }

    fn ensure_dirs(&self) -> Result<()> {
        for sub in [
            output::TMP_DIR,
            output::BUNDLES_DIR,
            output::ZIDV_DIR,
            output::SCRIPTS_DIR,
            output::IMAGES_DIR,
            output::NOTEBOOKS_DIR,
        ] {
            fs::create_dir_all(self.out_dir(sub))?;
        }
        Ok(())
    }

    /// Write every artifact for the sample at `flat_index`
    pub fn record(&mut self, flat_index: usize, context: &DispatchContext) -> Result<CaseArtifacts> {
        profiling::scope!("CaseRecorder::record");
        let loc = self.dims.locate(flat_index)?;
        let location = format!("{:3.0} E {:2.0} N", loc.lon, loc.lat);
        let percentiles = format!(
            "x%: {:2.3} y%: {:2.3}",
            context.x_percentile, context.y_percentile
        );
        log::info!("saving case for {} at {}", loc.timestamp, location);
        if !context.values.is_empty() {
            log::info!("{}", context.values);
        }
        log::info!("{}", percentiles);

        self.ensure_dirs()?;

        let common = naming::common_filename(
            &self.x_name,
            context.x_percentile,
            &self.y_name,
            context.y_percentile,
            loc.lat,
            loc.lon,
            loc.timestamp,
        );
        let mut artifacts = CaseArtifacts {
            common_name: common.clone(),
            ..Default::default()
        };

        for link in quicklook_links(&self.config, loc.timestamp) {
            log::info!("quicklook: {}", link);
        }

        let window = BundleWindow {
            lon: loc.lon,
            lat: loc.lat,
            lon_offset: self.config.lon_offset,
            lat_offset: self.config.lat_offset,
            timestamp: loc.timestamp,
            dt_from_center: self.config.dt_from_center,
        };
        let replacements = window.replacements(&context.metadata);
        let mut bundle_refs = Vec::new();
        for bundle in &self.config.bundles {
            let file = format!("{}_{}.xidv", common, bundle.tag);
            let template = self.config.templates_dir.join(format!("{}.xidv", bundle.template));
            let out = self.out_dir(output::BUNDLES_DIR).join(&file);
            template::render_file(&template, &out, &replacements)?;
            log::info!("bundle '{}' saved", bundle.tag);
            artifacts.bundles.push(out);
            bundle_refs.push(format!("../{}/{}", output::BUNDLES_DIR, file));
        }

        if let Some(first) = self.config.bundles.first() {
            let script = self
                .out_dir(output::SCRIPTS_DIR)
                .join(format!("idvImZIDVOutput_{}.isl", common));
            template::render_file(
                &self.config.templates_dir.join(defaults::SCRIPT_TEMPLATE),
                &script,
                &template::script_replacements(
                    &format!("{}_{}", common, first.tag),
                    &common,
                    &context.metadata,
                ),
            )?;
            artifacts.script = Some(script);
        }

        let snapshot_name = format!("{}_CH.png", common);
        let staged = Self::snapshot_staging_path(&self.config);
        if staged.exists() {
            let dest = self.out_dir(output::IMAGES_DIR).join(&snapshot_name);
            fs::copy(&staged, &dest)?;
            log::info!("wrote {}", dest.display());
            artifacts.snapshot = Some(dest);
        } else {
            log::warn!("no histogram snapshot at {}", staged.display());
        }

        let source = QuicklookSource {
            mirror: self.config.quicklook_dir.as_deref(),
            base_url: self.config.fetch_quicklooks.then_some(defaults::QUICKLOOK_BASE_URL),
        };
        let mut quicklook_refs = Vec::new();
        for var in &self.config.image_vars {
            let global = source.load_or_placeholder(var, loc.timestamp);
            let file = format!("{}_{}.png", common, var);
            let dest = self.out_dir(output::IMAGES_DIR).join(&file);
            quicklook::crop_around(&global, loc.lon, loc.lat).save(&dest)?;
            log::info!("wrote {}", dest.display());
            artifacts.quicklooks.push(dest);
            quicklook_refs.push(format!("../{}/{}", output::IMAGES_DIR, file));
        }

        let nb_path = self
            .out_dir(output::NOTEBOOKS_DIR)
            .join(format!("{}_{}.ipynb", self.config.notebook_tag, common));
        let nb_template = self.config.templates_dir.join(defaults::NOTEBOOK_TEMPLATE);
        if nb_path.exists() {
            log::info!("notebook {} already exists, leaving it", nb_path.display());
        } else if !nb_template.is_file() {
            log::warn!(
                "no notebook template at {}, skipping the case notebook",
                nb_template.display()
            );
        } else {
            let created = Local::now()
                .naive_local()
                .with_second(0)
                .and_then(|t| t.with_nanosecond(0))
                .map(|t| t.to_string())
                .unwrap_or_default();
            let content = NotebookContent {
                created,
                stats: vec![
                    loc.timestamp.to_string(),
                    location,
                    context.values.clone(),
                    percentiles,
                ],
                common_name: common.clone(),
                snapshot: artifacts
                    .snapshot
                    .as_ref()
                    .map(|_| format!("../{}/{}", output::IMAGES_DIR, snapshot_name)),
                quicklooks: quicklook_refs,
                bundles: bundle_refs,
            };
            write_notebook(&nb_template, &nb_path, &content)?;
            artifacts.notebook = Some(nb_path);
        }

        self.last = Some(artifacts.clone());
        Ok(artifacts)
    }
}

fn write_notebook(template: &Path, out: &Path, content: &NotebookContent) -> Result<()> {
    let text = fs::read_to_string(template)?;
    fs::write(out, notebook::render(&text, content)?)?;
    log::info!("case notebook created: {}", out.display());
    Ok(())
}

/// Archive URLs of the configured quicklook images at `timestamp`
pub fn quicklook_links(config: &CaseConfig, timestamp: NaiveDateTime) -> Vec<String> {
    config
        .image_vars
        .iter()
        .map(|var| quicklook::url(var, timestamp))
        .collect()
}

/// Commit the sample at `flat` without going through a click
///
/// Stages the histogram snapshot with the sample highlighted, then hands the
/// sample to `dispatcher` exactly as a second click would.
pub fn commit_flat_index(
    session: &Session,
    dispatcher: &mut ActionDispatcher,
    flat: i64,
) -> Result<PointSummary> {
    let flat_index = usize::try_from(flat).map_err(|_| ClickHistError::IndexOutOfRange {
        index: flat,
        len: session.dataset().len(),
    })?;
    let summary = session.summarize_flat(flat_index, None)?;
    snapshot::save(
        &CaseRecorder::snapshot_staging_path(&session.config().case),
        session.histogram(),
        session.points(),
        (session.x_axis().kind(), session.y_axis().kind()),
        Some((summary.x, summary.y)),
    )?;
    dispatcher.dispatch(session.instruction(&summary))?;
    Ok(summary)
}

impl CaseAction for CaseRecorder {
    fn perform(&mut self, flat_index: usize, context: &DispatchContext) -> Result<()> {
        self.record(flat_index, context).map(|_| ())
    }

    fn hint(&self) -> &str {
        "save IDV bundle..."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BundleTemplate;
    use crate::constants::placeholder as ph;
    use chrono::NaiveDate;

    fn dims() -> Dimensions {
        Dimensions::new(
            vec![200.0, 202.0, 204.0, 206.0],
            vec![-20.0, -18.0, -16.0],
            vec![0.0, 21600.0],
            NaiveDate::from_ymd_opt(2005, 5, 16)
                .unwrap()
                .and_hms_opt(0, 30, 0)
                .unwrap(),
        )
        .unwrap()
    }

    fn context() -> DispatchContext {
        DispatchContext {
            metadata: "Precip vs W500".into(),
            x_percentile: 99.5,
            y_percentile: 12.25,
            values: "Precip: 68 mm day-1, W500: 0.027 m s-1".into(),
        }
    }

    fn setup(root: &Path) -> CaseConfig {
        let templates = root.join("Templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(
            templates.join("G5NR_template_full.xidv"),
            format!("<c lon=\"{}\" lat=\"{}\">{}</c>", ph::CENTER_LON, ph::CENTER_LAT, ph::METADATA),
        )
        .unwrap();
        fs::write(
            templates.join(defaults::SCRIPT_TEMPLATE),
            "bundle=BUNDLENAME movie=MOVIENAME",
        )
        .unwrap();
        fs::write(
            templates.join(defaults::NOTEBOOK_TEMPLATE),
            r####"{"cells":[{"cell_type":"markdown","metadata":{},"source":["### Quick Stats"]},
                {"cell_type":"code","metadata":{},"outputs":[],"execution_count":null,"source":["loadBundle()"]}],
               "metadata":{},"nbformat":4,"nbformat_minor":0}"####,
        )
        .unwrap();

        CaseConfig {
            bundles: vec![BundleTemplate {
                template: "G5NR_template_full".into(),
                tag: "full".into(),
            }],
            notebook_tag: "Mar23".into(),
            templates_dir: templates,
            output_dir: root.join("Output"),
            fetch_quicklooks: false,
            ..CaseConfig::default()
        }
    }

    #[test]
    fn test_record_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path());
        let mut recorder = CaseRecorder::new(config, dims(), "Precip", "W500");

        // flat 17: lon 202, lat -18, six hours in
        let artifacts = recorder.record(17, &context()).unwrap();
        let common = "Precip_quantile_99.500_W500_quantile_12.250_lat_-18_lon_202_time_20050516_0630";
        assert_eq!(artifacts.common_name, common);

        let bundle = fs::read_to_string(&artifacts.bundles[0]).unwrap();
        assert_eq!(bundle, "<c lon=\"202.0\" lat=\"-18.0\">Precip vs W500</c>");
        assert!(artifacts.bundles[0].ends_with(format!("{}_full.xidv", common)));

        let script = fs::read_to_string(artifacts.script.as_ref().unwrap()).unwrap();
        assert_eq!(script, format!("bundle={}_full movie={}", common, common));

        // no snapshot staged, no quicklook mirror: placeholder crop still written
        assert!(artifacts.snapshot.is_none());
        assert_eq!(artifacts.quicklooks.len(), 1);
        assert!(artifacts.quicklooks[0].exists());

        let nb = fs::read_to_string(artifacts.notebook.as_ref().unwrap()).unwrap();
        assert!(nb.contains("202 E -18 N<br>"));
        assert!(!nb.contains("_CH.png"));
        assert!(nb.contains(&format!("#loadBundle('../GeneratedBundles/{}_full.xidv')", common)));
        assert_eq!(recorder.last_case(), Some(&artifacts));
    }

    #[test]
    fn test_existing_notebook_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path());
        let staged = CaseRecorder::snapshot_staging_path(&config);
        let mut recorder = CaseRecorder::new(config, dims(), "Precip", "W500");

        let first = recorder.record(17, &context()).unwrap();
        let nb_path = first.notebook.unwrap();
        fs::write(&nb_path, "edited by hand").unwrap();

        fs::write(&staged, b"png").unwrap();
        let second = recorder.record(17, &context()).unwrap();
        assert!(second.notebook.is_none());
        assert_eq!(fs::read_to_string(&nb_path).unwrap(), "edited by hand");
        assert!(second.snapshot.unwrap().exists());
    }

    #[test]
    fn test_staged_snapshot_is_linked_from_notebook() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path());
        let staged = CaseRecorder::snapshot_staging_path(&config);
        fs::create_dir_all(staged.parent().unwrap()).unwrap();
        fs::write(&staged, b"png").unwrap();
        let mut recorder = CaseRecorder::new(config, dims(), "Precip", "W500");

        let artifacts = recorder.record(17, &context()).unwrap();
        let snapshot = artifacts.snapshot.as_ref().unwrap();
        assert_eq!(fs::read(snapshot).unwrap(), b"png");

        let nb = fs::read_to_string(artifacts.notebook.as_ref().unwrap()).unwrap();
        assert!(nb.contains(&format!("![](../Images/{}_CH.png)", artifacts.common_name)));
    }

    #[test]
    fn test_missing_templates_without_bundles() {
        let dir = tempfile::tempdir().unwrap();
        let config = CaseConfig {
            templates_dir: dir.path().join("nowhere"),
            output_dir: dir.path().join("Output"),
            fetch_quicklooks: false,
            ..CaseConfig::default()
        };
        let mut recorder = CaseRecorder::new(config, dims(), "Precip", "W500");

        let artifacts = recorder.record(1, &context()).unwrap();
        assert!(artifacts.bundles.is_empty());
        assert!(artifacts.script.is_none());
        assert!(artifacts.notebook.is_none());
        assert_eq!(artifacts.quicklooks.len(), 1);
        assert!(artifacts.quicklooks[0].exists());
    }

    #[test]
    fn test_out_of_range_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = CaseRecorder::new(setup(dir.path()), dims(), "a", "b");
        assert!(recorder.perform(24, &context()).is_err());
        assert_eq!(recorder.hint(), "save IDV bundle...");
    }
}
