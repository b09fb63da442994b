use ffchain_common::{ProcessingError, StreamType};
use ffchain_probe::{parse_probe_output, probe, ProbeConfig, ProbeError};

const SAMPLE: &str = r#"{
    "streams": [
        {
            "index": 0,
            "codec_name": "h264",
            "codec_long_name": "H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10",
            "codec_type": "video",
            "width": 1920,
            "height": 1080,
            "pix_fmt": "yuv420p",
            "r_frame_rate": "30000/1001",
            "duration": "10.010000",
            "bit_rate": "4500000"
        },
        {
            "index": 1,
            "codec_name": "aac",
            "codec_type": "audio",
            "sample_rate": "48000",
            "channels": 2,
            "channel_layout": "stereo",
            "bit_rate": "128000"
        },
        {
            "index": 2,
            "codec_type": "data"
        }
    ],
    "format": {
        "filename": "sample.mp4",
        "nb_streams": 3,
        "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
        "format_long_name": "QuickTime / MOV",
        "duration": "10.010000",
        "size": "5800000",
        "bit_rate": "4635364",
        "tags": {
            "title": "Sample"
        }
    }
}"#;

#[test]
fn test_parse_sample_output() {
    let metadata = parse_probe_output(SAMPLE).unwrap();

    assert_eq!(metadata.format.nb_streams, 3);
    assert_eq!(metadata.format.size, Some(5_800_000));
    assert_eq!(metadata.format.tags.get("title").map(String::as_str), Some("Sample"));
    assert!((metadata.format.duration.unwrap() - 10.01).abs() < 1e-9);

    let video = metadata.first_video().unwrap();
    assert_eq!(video.codec_name.as_deref(), Some("h264"));
    assert_eq!((video.width, video.height), (Some(1920), Some(1080)));
    assert!((video.fps.unwrap() - 29.97).abs() < 0.01);

    let audio = metadata.first_audio().unwrap();
    assert_eq!(audio.index, 1);
    assert_eq!(audio.sample_rate, Some(48_000));
    assert_eq!(audio.channels, Some(2));

    assert_eq!(metadata.streams[2].stream_type, None);
    assert_eq!(metadata.streams_of(StreamType::Subtitle).count(), 0);
}

#[test]
fn test_parse_format_only() {
    let metadata = parse_probe_output(r#"{"format": {"format_name": "wav"}}"#).unwrap();
    assert!(metadata.streams.is_empty());
    assert!(metadata.first_audio().is_none());
    assert_eq!(metadata.format.nb_streams, 0);
}

#[test]
fn test_probe_error_converts_to_processing_error() {
    let err: ProcessingError = ProbeError::FileNotFound("a.mp4".to_string()).into();
    assert!(matches!(err, ProcessingError::FileNotFound(_)));

    let err: ProcessingError = ProbeError::ParseError("bad".to_string()).into();
    assert!(matches!(err, ProcessingError::FFmpegError(_)));
}

#[cfg(unix)]
mod fake_ffprobe {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("ffprobe");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{body}").unwrap();
        drop(file);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_probe_runs_program() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("sample.json");
        std::fs::write(&json, SAMPLE).unwrap();
        let script = write_script(dir.path(), &format!("cat '{}'", json.display()));

        let media = dir.path().join("sample.mp4");
        std::fs::write(&media, b"").unwrap();

        let config = ProbeConfig {
            program: script.display().to_string(),
            ..ProbeConfig::default()
        };
        let metadata = probe(&media, &config).unwrap();
        assert_eq!(metadata.streams.len(), 3);
    }

    #[test]
    fn test_probe_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "echo 'Invalid data found' >&2; exit 1");

        let media = dir.path().join("broken.mp4");
        std::fs::write(&media, b"garbage").unwrap();

        let config = ProbeConfig {
            program: script.display().to_string(),
            ..ProbeConfig::default()
        };
        match probe(&media, &config) {
            Err(ProbeError::FfprobeError(message)) => {
                assert!(message.contains("Invalid data found"))
            }
            other => panic!("expected ffprobe failure, got {other:?}"),
        }
    }
}
