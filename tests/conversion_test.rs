mod test_signals;

use std::fs;
use std::path::PathBuf;

use wavout::audio::{InputFormat, load_audio, looks_like_wav};
use wavout::config::{ConvertConfig, OutputConfig, RawInputConfig, SampleRate};
use wavout::wav::WavHeader;
use wavout::{DecodedAudio, WavError, save_wav};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wavout-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_raw(path: &PathBuf, samples: &[f32]) {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    fs::write(path, bytes).unwrap();
}

#[test]
fn test_raw_file_to_wav() {
    let dir = scratch_dir("raw");
    let channels = test_signals::stereo_sweep(0.05, 16000);
    let input = dir.join("take.f32");
    write_raw(&input, &test_signals::interleave(&channels));

    let raw = RawInputConfig {
        sample_rate: "16k".parse().unwrap(),
        channels: 2,
    };
    assert!(!looks_like_wav(&input).unwrap());
    let audio = load_audio(&input, InputFormat::Auto, &raw).unwrap();
    assert_eq!(audio.frame_count(), channels[0].len());

    let output = OutputConfig::default().output_path(&input).unwrap();
    assert_eq!(output, dir.join("take.wav"));

    let written = save_wav(&output, &audio).unwrap();
    let bytes = fs::read(&output).unwrap();
    assert_eq!(written, bytes.len());

    let header = WavHeader::parse(&bytes).unwrap();
    assert_eq!(header.sample_rate, 16000);
    assert_eq!(header.channels, 2);
    assert_eq!(header.frame_count(), audio.frame_count());
    assert!(looks_like_wav(&output).unwrap());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_float_wav_is_requantized_to_pcm16() {
    let dir = scratch_dir("float");
    let input = dir.join("float.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let tone = test_signals::sine(0.02, 22050, 1000.0, 0.9);
    {
        let mut writer = hound::WavWriter::create(&input, spec).unwrap();
        for &s in &tone {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    let audio = load_audio(&input, InputFormat::Auto, &RawInputConfig::default()).unwrap();
    assert_eq!(audio.sample_rate(), 22050);
    assert_eq!(audio.channel(0).unwrap(), tone.as_slice());

    let output = OutputConfig {
        suffix: "_pcm16".to_string(),
        ..Default::default()
    }
    .output_path(&input)
    .unwrap();
    save_wav(&output, &audio).unwrap();

    let reader = hound::WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().bits_per_sample, 16);
    assert_eq!(reader.spec().sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.len() as usize, tone.len());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_existing_output_requires_overwrite() {
    let dir = scratch_dir("overwrite");
    let input = dir.join("clip.f32");
    write_raw(&input, &[0.0, 0.0]);
    let audio = DecodedAudio::new(8000, vec![vec![0.0, 0.0]]).unwrap();
    save_wav(dir.join("clip.wav"), &audio).unwrap();

    let err = OutputConfig::default().output_path(&input).unwrap_err();
    assert!(matches!(err, WavError::Config(_)));

    let replace = OutputConfig {
        overwrite: true,
        ..Default::default()
    };
    assert_eq!(replace.output_path(&input).unwrap(), dir.join("clip.wav"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_truncated_raw_input_is_rejected() {
    let dir = scratch_dir("truncated");
    let input = dir.join("odd.raw");
    fs::write(&input, [0u8; 10]).unwrap();

    let err = load_audio(&input, InputFormat::Raw, &RawInputConfig::default()).unwrap_err();
    assert!(matches!(err, WavError::InvalidAudioInput(_)));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_forced_wav_on_garbage_is_unsupported() {
    let dir = scratch_dir("garbage");
    let input = dir.join("video.mp4");
    fs::write(&input, b"\x00\x00\x00\x18ftypmp42").unwrap();

    let err = load_audio(&input, InputFormat::Wav, &RawInputConfig::default()).unwrap_err();
    assert!(matches!(err, WavError::UnsupportedFormat(_)));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_config_file_round_trip() {
    let dir = scratch_dir("config");
    let path = dir.join("wavout.toml");
    fs::write(
        &path,
        "[raw]\nsample_rate = \"48k\"\nchannels = 1\n\n[output]\nsuffix = \"_mono\"\noverwrite = true\n",
    )
    .unwrap();

    let config = ConvertConfig::from_toml_file(&path).unwrap();
    assert_eq!(config.raw.sample_rate, SampleRate::from_hz(48000).unwrap());
    assert_eq!(config.raw.channels, 1);
    assert_eq!(config.output.suffix, "_mono");
    assert!(config.output.overwrite);
    assert!(config.output.dir.is_none());

    fs::write(&path, "[raw]\nsample_rate = 0\n").unwrap();
    assert!(matches!(
        ConvertConfig::from_toml_file(&path),
        Err(WavError::Config(_))
    ));

    let _ = fs::remove_dir_all(&dir);
}
