use std::path::{Path, PathBuf};

use siyu::FromUrl;
use siyu::config::DecodeConfig;
use siyu::input::{InputWrapper, RawFileInput};
use siyu::model::{BBox, DetectResult, Detection, Point};
use siyu::output::{ConsoleOutput, DirectoryRecordOutput, LabelTable, OutputWrapper, Render};
use siyu::frame::PredictionFrame;
use siyu::postprocess::YoloxDecoder;
use siyu::task::{ContinuousTask, OneShotTask, Task};
use url::Url;

fn scratch_dir(name: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("siyu-{}-{}", name, std::process::id()));
  let _ = std::fs::remove_dir_all(&dir);
  std::fs::create_dir_all(&dir).unwrap();
  dir
}

fn write_raw(path: &Path, values: &[f32]) {
  let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
  std::fs::write(path, bytes).unwrap();
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
  for entry in std::fs::read_dir(dir).unwrap() {
    let path = entry.unwrap().path();
    if path.is_dir() {
      collect_files(&path, out);
    } else {
      out.push(path);
    }
  }
}

fn sample_result() -> DetectResult {
  DetectResult::from(vec![Detection {
    bbox: BBox::new(10.0, 20.0, 30.0, 40.0),
    polygon: [
      Point::new(10.0, 20.0),
      Point::new(40.0, 20.0),
      Point::new(40.0, 60.0),
      Point::new(10.0, 60.0),
    ],
    label: 1,
    score: 0.875,
  }])
}

#[test]
fn raw_file_input_yields_one_frame() {
  let dir = scratch_dir("raw-file");
  let path = dir.join("pred.bin");
  write_raw(&path, &[0.5, 1.5, -3.0]);

  let url = Url::parse(&format!("raw://{}?width=1280&height=720", path.display())).unwrap();
  let mut input = RawFileInput::from_url(&url).unwrap();
  let frame = input.next().unwrap();
  assert_eq!(frame.data(), &[0.5, 1.5, -3.0]);
  assert_eq!((frame.image_width(), frame.image_height()), (1280, 720));
  assert_eq!(frame.scale(), None);
  assert!(input.next().is_none());
}

#[test]
fn raw_file_input_rejects_truncated_file() {
  let dir = scratch_dir("raw-truncated");
  let path = dir.join("pred.bin");
  std::fs::write(&path, [0u8; 6]).unwrap();

  let url = Url::parse(&format!("raw://{}?width=10&height=10", path.display())).unwrap();
  assert!(RawFileInput::from_url(&url).is_err());
}

#[test]
fn raw_directory_input_is_sorted_and_filtered() {
  let dir = scratch_dir("raw-dir");
  write_raw(&dir.join("b.bin"), &[2.0]);
  write_raw(&dir.join("a.bin"), &[1.0]);
  std::fs::write(dir.join("notes.txt"), "ignored").unwrap();
  std::fs::write(dir.join("c.bin"), [0u8; 3]).unwrap();

  let url = Url::parse(&format!("rawdir://{}?width=64&height=64&scale=2", dir.display())).unwrap();
  let frames: Vec<PredictionFrame> = InputWrapper::from_url(&url).unwrap().collect();
  // c.bin 长度不对被跳过
  assert_eq!(frames.len(), 2);
  assert_eq!(frames[0].data(), &[1.0]);
  assert_eq!(frames[1].data(), &[2.0]);
  assert_eq!(frames[0].scale(), Some(2.0));
}

#[test]
fn directory_record_writes_json() {
  let dir = scratch_dir("record");
  let output = DirectoryRecordOutput::new(dir.clone(), LabelTable::default(), false);
  let frame = PredictionFrame::new(vec![], 1280, 720).with_scale(0.5);

  output.render_result(&frame, &DetectResult::default()).unwrap();
  output.render_result(&frame, &sample_result()).unwrap();

  let mut files = Vec::new();
  collect_files(&dir, &mut files);
  // 空结果在未设置 always 时不记录
  assert_eq!(files.len(), 1);
  assert_eq!(files[0].extension().unwrap(), "json");

  let record: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
  assert_eq!(record["image_width"], 1280);
  assert_eq!(record["scale"], 0.5);
  let det = &record["detections"][0];
  assert_eq!(det["label"], 1);
  assert_eq!(det["name"], "R_G");
  assert_eq!(det["score"], 0.875);
  assert_eq!(det["bbox"]["width"], 30.0);
  assert_eq!(det["polygon"][2]["y"], 60.0);
  assert_eq!(det["color"].as_array().unwrap().len(), 3);
}

#[test]
fn directory_record_always_flag_and_custom_labels() {
  let dir = scratch_dir("record-always");
  let labels_path = dir.join("labels.json");
  std::fs::write(&labels_path, r#"["car", "truck"]"#).unwrap();
  let records = dir.join("out");

  let url = Url::parse(&format!(
    "folder://{}?always&labels={}",
    records.display(),
    labels_path.display()
  ))
  .unwrap();
  let output = OutputWrapper::from_url(&url).unwrap();
  let frame = PredictionFrame::new(vec![], 100, 100);

  output.render_result(&frame, &DetectResult::default()).unwrap();
  output.render_result(&frame, &sample_result()).unwrap();

  let mut files = Vec::new();
  collect_files(&records, &mut files);
  assert_eq!(files.len(), 2);

  let names: Vec<String> = files
    .iter()
    .filter_map(|f| {
      let record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(f).unwrap()).unwrap();
      record["detections"][0]["name"].as_str().map(str::to_string)
    })
    .collect();
  assert_eq!(names, vec!["truck".to_string()]);
}

#[test]
fn console_output_formats_detections() {
  let output = ConsoleOutput::from_url(&Url::parse("console:").unwrap()).unwrap();
  let lines = output.format_lines(&sample_result());
  assert_eq!(lines, vec!["R_G = 0.87500 at 10.00 20.00 30.00 x 40.00".to_string()]);
}

#[test]
fn unknown_output_scheme_is_rejected() {
  let url = Url::parse("rtsp://localhost/stream").unwrap();
  assert!(OutputWrapper::from_url(&url).is_err());
}

#[test]
fn oneshot_task_runs_pipeline() {
  let dir = scratch_dir("oneshot");
  let decoder = YoloxDecoder::new(DecodeConfig::default().input_size(64, 64).num_classes(1)).unwrap();

  // 64x64, 步长 8/16/32 共 64 + 16 + 4 个锚点，每个 14 个字段
  let mut values = vec![0.0f32; decoder.expected_len()];
  assert_eq!(values.len(), 84 * 14);
  values[12] = 1.0;
  values[13] = 0.9;
  let path = dir.join("pred.bin");
  write_raw(&path, &values);

  let input =
    InputWrapper::from_url(&Url::parse(&format!("raw://{}?width=64&height=64", path.display())).unwrap())
      .unwrap();
  let records = dir.join("records");
  let output = DirectoryRecordOutput::new(records.clone(), LabelTable::default(), false);

  OneShotTask.run_task(input, decoder, output).unwrap();

  let mut files = Vec::new();
  collect_files(&records, &mut files);
  assert_eq!(files.len(), 1);
}

#[test]
fn continuous_task_stops_at_frame_number() {
  let dir = scratch_dir("continuous");
  let decoder = YoloxDecoder::new(DecodeConfig::default().input_size(32, 32).num_classes(1)).unwrap();
  let mut values = vec![0.0f32; decoder.expected_len()];
  values[12] = 1.0;
  values[13] = 1.0;
  for name in ["f0.bin", "f1.bin", "f2.bin"] {
    write_raw(&dir.join(name), &values);
  }

  let input =
    InputWrapper::from_url(&Url::parse(&format!("rawdir://{}?width=32&height=32", dir.display())).unwrap())
      .unwrap();
  let records = dir.join("records");
  let output = DirectoryRecordOutput::new(records.clone(), LabelTable::default(), true);

  ContinuousTask::default()
    .with_frame_number(Some(2))
    .run_task(input, decoder, output)
    .unwrap();

  let mut files = Vec::new();
  collect_files(&records, &mut files);
  assert_eq!(files.len(), 2);
}
