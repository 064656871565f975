use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use serde::Serialize;
use yw_core::{Camera, Detection, Detector, Entity, Scene};

use crate::error::ReportResult;
use crate::schema::{
    Coordinates, ElkIndex, Fov, MDX_VERSION, MdxFrames, MdxObject, MdxRaw, RoiCount,
};

/// Place written into every `mdx-frames` document unless overridden.
pub const DEFAULT_PLACE: &str = "city=Austin/building=Office/room=Cafeteria";

/// Writes camera detections as an Elasticsearch dump, one JSON document per
/// line.
///
/// Each [`Analytics::record`] call is one frame: the timestamp moves forward
/// one second, then every camera gets an `mdx-raw` line followed by an
/// `mdx-frames` line.
pub struct Analytics<W: Write> {
    out: W,
    timestamp: DateTime<Utc>,
    place: String,
    lines: u64,
}

impl Analytics<BufWriter<File>> {
    /// Create (or truncate) a dump file.
    pub fn create(path: &Path, start: DateTime<Utc>) -> ReportResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), start))
    }
}

impl<W: Write> Analytics<W> {
    /// Write to `out`; the first frame is stamped one second after `start`.
    pub fn new(out: W, start: DateTime<Utc>) -> Self {
        Self {
            out,
            timestamp: start,
            place: DEFAULT_PLACE.to_string(),
            lines: 0,
        }
    }

    /// Use a different place string.
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = place.into();
        self
    }

    /// Timestamp of the last recorded frame.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Number of lines written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    /// Record one frame for every camera of `scene`.
    pub fn record(&mut self, scene: &Scene, frame: u64) -> ReportResult<()> {
        self.timestamp += TimeDelta::seconds(1);
        let stamp = format_timestamp(self.timestamp);
        let day = self.timestamp.format("%Y-%m-%d");

        for camera in scene.cameras().values() {
            let raw = self.raw(camera, &stamp, frame);
            self.write_line(&ElkIndex::new(format!("mdx-raw-{day}"), raw))?;
        }
        for camera in scene.cameras().values() {
            let frames = self.frames(scene, camera, &stamp, frame);
            self.write_line(&ElkIndex::new(format!("mdx-frames-{day}"), frames))?;
        }
        debug!("frame {frame}: {} cameras at {stamp}", scene.cameras().len());
        Ok(())
    }

    /// Flush buffered lines and hand back the writer.
    pub fn finish(mut self) -> ReportResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn raw(&self, camera: &Camera, stamp: &str, frame: u64) -> MdxRaw {
        MdxRaw {
            timestamp: stamp.to_string(),
            id: frame.to_string(),
            sensor_id: camera.label().to_string(),
            objects: camera
                .detections()
                .iter()
                .map(|d| MdxObject::new(d.id.as_str(), &*d.label))
                .collect(),
            kind: "mdx-raw".to_string(),
            version: MDX_VERSION.to_string(),
        }
    }

    fn frames(&self, scene: &Scene, camera: &Camera, stamp: &str, frame: u64) -> MdxFrames {
        let fov = camera
            .detections_sorted()
            .into_iter()
            .map(|(kind, seen)| Fov {
                id: String::new(),
                coordinates: Vec::new(),
                count: seen.len(),
                ids: Vec::new(),
                kind: kind.to_string(),
            })
            .collect();

        let mut rois = Vec::new();
        for roi in scene.rois_of(camera) {
            for (kind, seen) in roi.detections_sorted() {
                rois.push(RoiCount {
                    id: roi.label().to_string(),
                    coordinates: seen.iter().map(|d| coordinates(d)).collect(),
                    count: seen.len(),
                    ids: seen.iter().map(|d| d.id.to_string()).collect(),
                    kind: kind.to_string(),
                });
            }
        }

        MdxFrames {
            timestamp: stamp.to_string(),
            fov,
            rois,
            version: MDX_VERSION.to_string(),
            sensor_id: camera.label().to_string(),
            objects: Vec::new(),
            id: frame.to_string(),
            info: BTreeMap::from([("place".to_string(), self.place.clone())]),
            kind: "mdx-frames".to_string(),
        }
    }

    fn write_line<T: Serialize>(&mut self, line: &T) -> ReportResult<()> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }
}

fn coordinates(detection: &Detection) -> Coordinates {
    let at = detection.position();
    Coordinates {
        x: at.x,
        y: at.y,
        z: 0.0,
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::Value;
    use yw_core::{Counts, EntityId, Process, Rect, Roi};

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T23:59:59.250Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    /// One process stocked with bread, one camera over it with an ROI on its
    /// left half, and a second camera looking elsewhere.
    fn scene() -> Scene {
        let mut scene = Scene::new(500.0, 500.0);
        scene
            .add_process(Process::new(
                "p1",
                "oven",
                Rect::new(0.0, 0.0, 40.0, 40.0),
                5,
                Counts::from([("dough".to_string(), 1)]),
                Counts::from([("bread".to_string(), 1)]),
            ))
            .unwrap();
        let cam = Camera::new("c1", "kitchen", Rect::new(0.0, 0.0, 100.0, 100.0));
        let roi = Roi::new("r1", "counter", &cam, Rect::new(0.0, 0.0, 100.0, 100.0));
        scene.add_camera(cam).unwrap();
        scene.add_roi(roi).unwrap();
        scene
            .add_camera(Camera::new("c2", "hall", Rect::new(300.0, 300.0, 50.0, 50.0)))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        scene.seed_items(&EntityId::new("p1"), "bread", 3, &mut rng);
        scene.run_detection();
        scene
    }

    fn lines(buf: &[u8]) -> Vec<Value> {
        std::str::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn timestamp_has_millisecond_precision() {
        assert_eq!(format_timestamp(start()), "2024-05-01T23:59:59.250Z");
        let whole = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(format_timestamp(whole), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn record_writes_raw_then_frames_per_camera() {
        let scene = scene();
        let mut analytics = Analytics::new(Vec::new(), start());
        analytics.record(&scene, 0).unwrap();
        assert_eq!(analytics.lines_written(), 4);
        let out = lines(&analytics.finish().unwrap());

        let indices: Vec<_> = out.iter().map(|l| l["_index"].as_str().unwrap()).collect();
        // The first frame is one second after the start, past midnight.
        assert_eq!(
            indices,
            vec![
                "mdx-raw-2024-05-02",
                "mdx-raw-2024-05-02",
                "mdx-frames-2024-05-02",
                "mdx-frames-2024-05-02",
            ]
        );

        let raw = &out[0]["_source"];
        assert_eq!(raw["timestamp"], "2024-05-02T00:00:00.250Z");
        assert_eq!(raw["sensorId"], "kitchen");
        assert_eq!(raw["id"], "0");
        assert_eq!(raw["type"], "mdx-raw");
        assert_eq!(raw["version"], "4.0");
        assert_eq!(raw["objects"].as_array().unwrap().len(), 3);
        assert_eq!(raw["objects"][0]["type"], "bread");

        let quiet = &out[1]["_source"];
        assert_eq!(quiet["sensorId"], "hall");
        assert!(quiet["objects"].as_array().unwrap().is_empty());
    }

    #[test]
    fn frames_summarise_fov_and_rois() {
        let scene = scene();
        let mut analytics = Analytics::new(Vec::new(), start()).with_place("site=test");
        analytics.record(&scene, 7).unwrap();
        let out = lines(&analytics.finish().unwrap());

        let frames = &out[2]["_source"];
        assert_eq!(frames["type"], "mdx-frames");
        assert_eq!(frames["id"], "7");
        assert_eq!(frames["info"]["place"], "site=test");
        assert_eq!(frames["fov"][0]["type"], "bread");
        assert_eq!(frames["fov"][0]["count"], 3);

        let roi = &frames["rois"][0];
        assert_eq!(roi["id"], "counter");
        assert_eq!(roi["count"], 3);
        assert_eq!(roi["ids"].as_array().unwrap().len(), 3);
        assert_eq!(roi["coordinates"][0]["z"], 0.0);

        let empty = &out[3]["_source"];
        assert!(empty["fov"].as_array().unwrap().is_empty());
        assert!(empty["rois"].as_array().unwrap().is_empty());
    }

    #[test]
    fn index_date_comes_from_the_frame_time() {
        let eve = NaiveDate::from_ymd_opt(9999, 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .unwrap();
        let start = DateTime::<Utc>::from_naive_utc_and_offset(eve, Utc);
        let mut analytics = Analytics::new(Vec::new(), start);
        analytics.record(&scene(), 0).unwrap();
        let out = lines(&analytics.finish().unwrap());

        let first = start + TimeDelta::seconds(1);
        let raw = out[0]["_index"].as_str().unwrap();
        assert_eq!(raw, format!("mdx-raw-{}", first.format("%Y-%m-%d")));
        assert!(raw.ends_with("-01-01"));
    }

    #[test]
    fn timestamp_advances_one_second_per_frame() {
        let scene = Scene::new(10.0, 10.0);
        let mut analytics = Analytics::new(Vec::new(), start());
        for frame in 0..5 {
            analytics.record(&scene, frame).unwrap();
        }
        assert_eq!(analytics.timestamp(), start() + TimeDelta::seconds(5));
        assert_eq!(analytics.lines_written(), 0);
    }

    #[test]
    fn create_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdx_elk.json");
        let mut analytics = Analytics::create(&path, start()).unwrap();
        analytics.record(&scene(), 0).unwrap();
        analytics.finish().unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
    }
}
