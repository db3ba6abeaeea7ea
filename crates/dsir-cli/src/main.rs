use dsir_cli::{cli, init_tracing, run};

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let json_logs = matches
        .get_one::<String>("log-format")
        .is_some_and(|f| f == "json");
    init_tracing(json_logs);
    run(&matches)
}
