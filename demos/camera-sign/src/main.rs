use log::info;
use sign_base::init_stdout_logger;
use sign_camera::{CameraConfig, V4l2Camera};
use sign_infer::{
    BundleConfig, ClassifierConfig, Device, ModelBundle, ModelSource, OnnxBackend, RemoteConfig,
    SignLanguage,
};
use sign_loop::{DetectionLoop, LoopState};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const TICK_INTERVAL: Duration = Duration::from_millis(33);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_stdout_logger();

    let language: SignLanguage = env::var("SIGN_LANGUAGE")
        .unwrap_or_else(|_| "ASL".to_string())
        .parse()?;
    let landmark_model: PathBuf = env::var("SIGN_LANDMARK_MODEL")
        .unwrap_or_else(|_| "models/handpose.onnx".to_string())
        .into();
    let device = env::var("SIGN_DEVICE").unwrap_or_else(|_| "/dev/video0".to_string());

    info!("camera-sign demo, language {language}");
    info!("landmark model: {}", landmark_model.display());

    // Remote interpretation when an endpoint is configured, otherwise
    // the local classifier model.
    let classifier = match env::var("SIGN_ENDPOINT") {
        Ok(endpoint) => {
            info!("classifying via remote endpoint {endpoint}");
            ClassifierConfig::Remote(RemoteConfig::new(endpoint))
        }
        Err(_) => {
            let model: PathBuf = env::var("SIGN_CLASSIFIER_MODEL")
                .unwrap_or_else(|_| "models/sign-cnn.onnx".to_string())
                .into();
            info!("classifying locally with {}", model.display());
            ClassifierConfig::Local {
                model: ModelSource::File(model),
                labels: None,
            }
        }
    };

    info!("opening camera {device}");
    let config = CameraConfig::default()
        .with_device(device)
        .with_width(WIDTH)
        .with_height(HEIGHT);
    let camera = V4l2Camera::new(config)?;

    let backend = OnnxBackend::new(Device::Cpu);
    let mut bundle = ModelBundle::new(language);
    bundle.load(
        &backend,
        BundleConfig::new(ModelSource::File(landmark_model), classifier),
    )?;

    let mut detector = DetectionLoop::new(camera, bundle);
    detector.start();

    let mut last_line = String::new();
    loop {
        detector.tick();
        if detector.state() == LoopState::Disposed {
            break;
        }

        let line = match detector.latest_detection() {
            Some(detection) => format!(
                "{} ({:.1}%)  |  {}",
                detection.gesture,
                detection.confidence * 100.0,
                detector.transcript()
            ),
            None if detector.hand_present() => "Processing sign...".to_string(),
            None => "No hand detected. Please show your hand to the camera.".to_string(),
        };
        if line != last_line {
            println!("{line}");
            last_line = line;
        }

        std::thread::sleep(TICK_INTERVAL);
    }

    Ok(())
}
