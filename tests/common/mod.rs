#![allow(dead_code)]

use std::{
    io::Cursor,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use adforge::{
    AdError, AdRequest, AdResult, AnalysisModel, AnalysisRequest, ImageModel, ImageRequest,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn png(img: &image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// A product shot: a colored rounded blob on a transparent background.
pub fn product_png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        let dx = x as f64 - w as f64 / 2.0;
        let dy = y as f64 - h as f64 / 2.0;
        let r = (w.min(h) as f64) * 0.4;
        if dx * dx + dy * dy <= r * r {
            image::Rgba([220, 40, 60, 255])
        } else {
            image::Rgba([0, 0, 0, 0])
        }
    });
    png(&img)
}

pub fn gaming_request() -> AdRequest {
    AdRequest {
        product_image: product_png(800, 800),
        product_description: "RGB wireless gaming headset".to_string(),
        intent: "launch campaign, bold and loud".to_string(),
        industry: Some("gaming".to_string()),
        headline: Some("Level Up".to_string()),
        tagline: None,
        cta: Some("Shop Now".to_string()),
    }
}

/// Image model returning a fixed-size solid image, or failing every call.
pub struct ScriptedImageModel {
    pub output: Option<(u32, u32)>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedImageModel {
    pub fn painting(w: u32, h: u32) -> Arc<Self> {
        Arc::new(Self {
            output: Some((w, h)),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            output: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ImageModel for ScriptedImageModel {
    fn generate(&self, request: &ImageRequest) -> AdResult<Vec<u8>> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match self.output {
            Some((w, h)) => Ok(png(&image::RgbaImage::from_pixel(
                w,
                h,
                image::Rgba([12, 12, 24, 255]),
            ))),
            None => Err(AdError::inference("no image part in response")),
        }
    }
}

/// Analysis model answering by which stage asked. `None` answers fail the call.
#[derive(Default)]
pub struct ScriptedAnalysisModel {
    pub refinement: Option<String>,
    pub polish: Option<String>,
    pub coordinates: Option<String>,
    pub verdict: Option<String>,
    pub calls: AtomicUsize,
    pub verdict_calls: AtomicUsize,
}

impl ScriptedAnalysisModel {
    pub fn verdict_score(score: u32, rectangles: bool) -> String {
        format!(
            r#"{{"textLegibility": {score}, "textSharpness": {score}, "productQuality": {score},
                "professionalQuality": {score}, "overallScore": {score},
                "rectangleArtifactsDetected": {rectangles}, "blurredText": false,
                "headlineReadable": true, "ctaVisible": true}}"#
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn verdict_calls(&self) -> usize {
        self.verdict_calls.load(Ordering::SeqCst)
    }
}

impl AnalysisModel for ScriptedAnalysisModel {
    fn analyze(&self, request: &AnalysisRequest) -> AdResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let p = &request.prompt;
        let answer = if p.contains("quality inspector") {
            self.verdict_calls.fetch_add(1, Ordering::SeqCst);
            &self.verdict
        } else if p.contains("Decide where the copy goes") {
            &self.coordinates
        } else if p.contains("art director") {
            &self.polish
        } else if p.contains("plan the composition") {
            &self.refinement
        } else {
            &None
        };
        answer
            .clone()
            .ok_or_else(|| AdError::inference("scripted failure"))
    }
}
