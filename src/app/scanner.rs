use crate::app::models::{RuntimeConfig, WalkMatch};
use crate::app::probe::{resolve_title, round_duration, Prober};
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::Path;

pub struct Scanner<'a, P: Prober> {
    config: &'a RuntimeConfig,
    prober: &'a P,
}

impl<'a, P: Prober> Scanner<'a, P> {
    pub fn new(config: &'a RuntimeConfig, prober: &'a P) -> Self {
        Self { config, prober }
    }

    /// Walks the base directory depth-first, entries sorted by name, and
    /// returns matches in discovery order.
    ///
    /// Any traversal error aborts the scan. Files that fail probing are skipped.
    pub fn scan(&self) -> Result<Vec<WalkMatch>> {
        let mut matches = Vec::new();

        // Plain recursive walk: no ignore files, hidden entries included.
        let walker = WalkBuilder::new(&self.config.base_dir)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for result in walker {
            let entry = result.context(format!(
                "Failed to walk {}",
                self.config.base_dir.display()
            ))?;

            // Root and subdirectories are never candidates.
            if entry.file_type().map_or(true, |ft| ft.is_dir()) {
                continue;
            }

            if let Some(found) = self.process_entry(entry.path()) {
                log::debug!("Matched {:?}", found.path);
                matches.push(found);
            }
        }

        Ok(matches)
    }

    fn process_entry(&self, path: &Path) -> Option<WalkMatch> {
        let file_name = path.file_name()?.to_string_lossy();
        let filters = &self.config.filters;

        // Name checks first so rejected files never pay for a probe.
        if !filters.passes_name(&file_name) {
            log::debug!("Skipping {:?}, name filter", path);
            return None;
        }

        let info = match self.prober.probe(path) {
            Ok(info) => info,
            Err(err) => {
                log::debug!("Skipping {:?}, not a media file: {:#}", path, err);
                return None;
            }
        };

        let title = resolve_title(&info, path);
        if !filters.passes_metadata(&info.format_name, &title) {
            log::debug!("Skipping {:?} ({}, {:?})", path, info.format_name, title);
            return None;
        }

        Some(WalkMatch {
            path: path.to_path_buf(),
            duration_secs: round_duration(info.duration_secs),
            title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::filter::{FilterChain, FormatFilter, NameFilter};
    use crate::app::probe::fake::FakeProber;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"data").unwrap();
    }

    fn config(root: &Path, name: NameFilter, format: FormatFilter) -> RuntimeConfig {
        RuntimeConfig {
            base_dir: root.to_path_buf(),
            filters: FilterChain { name, format },
            output_filename: "playlist.m3u8".into(),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }

    fn titles(matches: &[WalkMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn intro_track_is_found_and_readme_is_not() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "01-intro.mp3");
        touch(dir.path(), "readme.txt");
        let prober = FakeProber::default().with("01-intro.mp3", "mp3", 61.4, Some("Intro"));
        let cfg = config(dir.path(), NameFilter::Off, FormatFilter::Supported);

        let matches = Scanner::new(&cfg, &prober).scan().unwrap();

        assert_eq!(
            matches,
            vec![WalkMatch {
                path: dir.path().join("01-intro.mp3"),
                duration_secs: 61,
                title: "Intro".into(),
            }]
        );
    }

    #[test]
    fn walk_order_is_depth_first_by_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.mp3");
        touch(dir.path(), "a/z.mp3");
        touch(dir.path(), "a/c.flac");
        touch(dir.path(), "c.mp3");
        let prober = FakeProber::default()
            .with("b.mp3", "mp3", 1.0, None)
            .with("z.mp3", "mp3", 1.0, None)
            .with("c.flac", "flac", 1.0, None)
            .with("c.mp3", "mp3", 1.0, None);
        let cfg = config(dir.path(), NameFilter::Off, FormatFilter::Supported);

        let matches = Scanner::new(&cfg, &prober).scan().unwrap();

        assert_eq!(titles(&matches), vec!["c", "z", "b", "c"]);
        assert_eq!(matches[0].path, dir.path().join("a").join("c.flac"));
    }

    #[test]
    fn name_rejections_are_never_probed() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "A-side.mp3");
        touch(dir.path(), "B-side.mp3");
        let prober = FakeProber::default()
            .with("A-side.mp3", "mp3", 10.0, None)
            .with("B-side.mp3", "mp3", 10.0, None);
        let cfg = config(
            dir.path(),
            NameFilter::Prefix("A".into()),
            FormatFilter::Supported,
        );

        let matches = Scanner::new(&cfg, &prober).scan().unwrap();

        assert_eq!(titles(&matches), vec!["A-side"]);
        assert_eq!(prober.probed_names(), vec!["A-side.mp3"]);
    }

    #[test]
    fn suffix_filter_sees_the_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "song (live).mp3");
        let prober = FakeProber::default().with("song (live).mp3", "mp3", 3.0, None);

        let cfg = config(
            dir.path(),
            NameFilter::Suffix("(live)".into()),
            FormatFilter::Supported,
        );
        assert!(Scanner::new(&cfg, &prober).scan().unwrap().is_empty());
        assert!(prober.probed_names().is_empty());

        let cfg = config(
            dir.path(),
            NameFilter::Suffix("(live).mp3".into()),
            FormatFilter::Supported,
        );
        assert_eq!(Scanner::new(&cfg, &prober).scan().unwrap().len(), 1);
    }

    #[test]
    fn probe_failures_do_not_stop_the_walk() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a-broken.mp3");
        touch(dir.path(), "b-good.mp3");
        let prober = FakeProber::default().with("b-good.mp3", "mp3", 5.0, None);
        let cfg = config(dir.path(), NameFilter::Off, FormatFilter::Supported);

        let matches = Scanner::new(&cfg, &prober).scan().unwrap();

        assert_eq!(titles(&matches), vec!["b-good"]);
        assert_eq!(prober.probed_names(), vec!["a-broken.mp3", "b-good.mp3"]);
    }

    #[test]
    fn selected_format_excludes_other_formats() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "one.mp3");
        touch(dir.path(), "two.mp3");
        let prober = FakeProber::default()
            .with("one.mp3", "mp3", 5.0, None)
            .with("two.mp3", "mp3", 5.0, None);
        let cfg = config(
            dir.path(),
            NameFilter::Off,
            FormatFilter::Only("flac".into()),
        );

        assert!(Scanner::new(&cfg, &prober).scan().unwrap().is_empty());
    }

    #[test]
    fn unsupported_formats_are_excluded_by_default() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "clip.ogg");
        let prober = FakeProber::default().with("clip.ogg", "ogg", 5.0, Some("Clip"));
        let cfg = config(dir.path(), NameFilter::Off, FormatFilter::Supported);

        assert!(Scanner::new(&cfg, &prober).scan().unwrap().is_empty());
    }

    #[test]
    fn title_filter_uses_tag_then_stem() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "01.mp3");
        touch(dir.path(), "02 Live Set.flac");
        touch(dir.path(), "03.mp3");
        let prober = FakeProber::default()
            .with("01.mp3", "mp3", 5.0, Some("Live in Tokyo"))
            .with("02 Live Set.flac", "flac", 5.0, None)
            .with("03.mp3", "mp3", 5.0, Some("Studio"));
        let cfg = config(
            dir.path(),
            NameFilter::TitleContains("Live".into()),
            FormatFilter::Supported,
        );

        let matches = Scanner::new(&cfg, &prober).scan().unwrap();

        assert_eq!(titles(&matches), vec!["Live in Tokyo", "02 Live Set"]);
    }

    #[test]
    fn missing_base_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let prober = FakeProber::default();
        let cfg = config(
            &dir.path().join("gone"),
            NameFilter::Off,
            FormatFilter::Supported,
        );

        assert!(Scanner::new(&cfg, &prober).scan().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.mp3");
        touch(dir.path(), "locked/b.mp3");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores directory permissions, nothing to check then.
        let result = if fs::read_dir(&locked).is_ok() {
            None
        } else {
            let prober = FakeProber::default()
                .with("a.mp3", "mp3", 1.0, None)
                .with("b.mp3", "mp3", 1.0, None);
            let cfg = config(dir.path(), NameFilter::Off, FormatFilter::Supported);
            Some(Scanner::new(&cfg, &prober).scan())
        };

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if let Some(result) = result {
            assert!(result.is_err());
        }
    }
}
