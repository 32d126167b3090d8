//! Capture a short binaural loop and export it repeated eight times

use mindwave_export::{ExportBuilder, ExportFormat, ExportStatus, LoopRecorder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let sample_rate = 44100;
    let mut recorder = LoopRecorder::new(sample_rate);
    recorder.start()?;

    // 2 seconds of a 200 Hz / 210 Hz pair (10 Hz beat), fed in 512-frame blocks
    let total = sample_rate as usize * 2;
    let mut frame = 0;
    while frame < total {
        let block = 512.min(total - frame);
        let (left, right): (Vec<f32>, Vec<f32>) = (frame..frame + block)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (
                    (2.0 * std::f32::consts::PI * 200.0 * t).sin() * 0.4,
                    (2.0 * std::f32::consts::PI * 210.0 * t).sin() * 0.4,
                )
            })
            .unzip();
        recorder.push(&left, &right)?;
        frame += block;
    }
    let chunks = recorder.stop()?;

    let mut handle = ExportBuilder::new(chunks, sample_rate)
        .format(ExportFormat::Wav24)
        .loop_count(8)
        .start()?;

    loop {
        match handle.progress() {
            ExportStatus::Running(p) => println!("{:>3}% {} ({})", p.percent, p.step.label(), p.detail),
            ExportStatus::Complete | ExportStatus::Failed(_) => break,
            ExportStatus::Pending => {}
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    let result = handle.wait()?;
    mindwave_export::write_export("binaural_loop.wav", &result)?;
    println!(
        "Exported binaural_loop.wav ({:.2}s in {}s)",
        result.duration_seconds,
        result.processing_time_display()
    );
    Ok(())
}
