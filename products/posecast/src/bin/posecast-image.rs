use {inference::Inference, posecast::*, std::path::Path};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    base::init_stdout_logger();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: {} <config.json> <image>", args[0]);
        std::process::exit(2);
    }
    let config = Config::load(&args[1])?;
    let image_path = Path::new(&args[2]);

    let inference = Inference::new(config.device()?)?;
    let mut pipeline = Pipeline::load(&config, &inference)?;

    let image = image::load_rgb(image_path)?;
    let image_name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args[2].clone());

    let result = pipeline.process(&image_name, &image)?;
    log::info!("{}: {} person(s)", result.image_name, result.result.len());

    match &config.results_path {
        Some(path) => {
            ResultWriter::create(path)?.write(&result)?;
            log::info!("result written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}
