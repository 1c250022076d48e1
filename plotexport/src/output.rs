use plot_model::PlotConfiguration;
use plotexport_core::{DataExportMode, ExportOutcome, TargetFormat};

pub fn print_info(message: &str) {
    println!("[plotexport][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[plotexport][ERROR] {message}");
}

pub fn print_outcome(outcome: &ExportOutcome) {
    if let Some(data) = &outcome.data_file {
        print_info(&format!("Data written to {}", data.display()));
    }
    if outcome.files.is_empty() {
        print_info("No files written");
    }
    for file in &outcome.files {
        print_info(&format!("Wrote {}", file.display()));
    }
}

pub fn print_modes(target: TargetFormat, modes: &[DataExportMode]) {
    print_info(&format!("Data-export modes for {target}:"));
    for mode in modes {
        println!("{mode}");
    }
}

pub fn print_configurations(configs: &[PlotConfiguration]) {
    if configs.is_empty() {
        print_info("Document holds no plots");
        return;
    }
    print_info("Plots:");
    for (idx, config) in configs.iter().enumerate() {
        let mut line = format!("[{idx}] {} x={}", config.kind, config.x);
        if let Some(y) = &config.y {
            line.push_str(&format!(" y={y}"));
        }
        if let Some(z) = &config.z {
            let scale = if config.continuous_color {
                "continuous"
            } else {
                "categorical"
            };
            line.push_str(&format!(" color={z} ({scale})"));
        }
        println!("{line}");
    }
}
