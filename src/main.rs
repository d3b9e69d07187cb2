// This file is an example of how to use the `rota_vision` library.
// The main library entry point is `src/lib.rs`.

fn main() {
    env_logger::init();
    println!("Rota Vision Engine - Example Runner");
    // In a real deployment you would wire platform capture and viewport
    // backends to the pipeline here and hand the resulting placements to an
    // input-injection backend.
    //
    // Example:
    // let config = rota_vision::pipeline::EngineConfig::default();
    // let mut pipeline = AutofillPipeline::new(capture, viewport, config);
    // let report = pipeline.fill(&entries)?;
    // println!("Report: {:?}", report);
}
