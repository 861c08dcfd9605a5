use ccs_spgemm::utils::random_input;
use ccs_spgemm::{distributed_spgemm, reference_multiply, run_local, SpgemmConfig};

fn main() {
    env_logger::init();

    println!("Distributed CCS SpGEMM demo");

    let (rows, inner, cols) = (60, 40, 30);
    let input = random_input(rows, inner, cols, 0.05, 42);
    let config = SpgemmConfig::default();

    // Largest group size that still gives every process at least one row
    let world_size = num_cpus::get().clamp(1, rows);

    println!("\nProblem:");
    println!("  A: {} x {} ({} non-zeros)", rows, inner, input.a_values.len());
    println!("  B: {} x {} ({} non-zeros)", inner, cols, input.b_values.len());
    println!("  Processes: {}", world_size);

    let outputs = run_local(world_size, |comm| distributed_spgemm(&input, comm, &config));

    let reference = match reference_multiply(&input, config.drop_tolerance) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Reference multiplication failed: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::with_capacity(outputs.len());
    for (rank, output) in outputs.into_iter().enumerate() {
        match output {
            Ok(c) => {
                println!(
                    "  rank {}: {} x {} result, {} non-zeros",
                    rank,
                    c.rows,
                    c.cols,
                    c.nnz()
                );
                results.push(c);
            }
            Err(e) => {
                eprintln!("  rank {}: {}", rank, e);
                std::process::exit(1);
            }
        }
    }

    println!("\nReference result: {} non-zeros", reference.nnz());
    if rows % world_size != 0 {
        println!(
            "Note: {} trailing rows are not owned by any process, skipping comparison",
            rows % world_size
        );
        return;
    }

    if results.iter().all(|c| c == &reference) {
        println!("Distributed result matches the reference on every rank");
    } else {
        eprintln!("Distributed result differs from the reference");
        std::process::exit(1);
    }
}
