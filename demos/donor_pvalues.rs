use donor_emd::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn main() -> Result<()> {
    println!("=== donor_emd: Pairwise Donor EMD with Permutation p-values ===\n");

    // Four donors on a 4-column diffusion map. Donors C and D are shifted
    // along component 1, donor D also along component 2.
    let shifts = [("A", 0.0, 0.0), ("B", 0.0, 0.0), ("C", 0.8, 0.0), ("D", 0.8, 0.8)];
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut labels = Vec::new();
    let mut rows = Vec::new();
    for (donor, shift_1, shift_2) in shifts {
        for _ in 0..60 {
            labels.push(donor.to_string());
            rows.push(vec![
                1.0,
                rng.gen::<f64>() + shift_1,
                rng.gen::<f64>() + shift_2,
                rng.gen::<f64>(),
            ]);
        }
    }
    let data = ObservationSet::new(rows.len())
        .with_labels("donorID", labels)?
        .with_embedding("X_diffmap", Embedding::from_rows(&rows)?)?;

    let config = EmdConfig::default()
        .with_n_comp(3)
        .with_n_permutations(200)
        .with_n_workers(4);

    println!("Donor pairs: {:?}", data.donor_pairs("donorID")?);
    let table = emd_pval(&data, &config)?;

    println!("\n{:<6} {:<6} {:>9} {:>8} {:>6}", "donor1", "donor2", "component", "emd", "pval");
    for r in &table {
        println!(
            "{:<6} {:<6} {:>9} {:>8.4} {:>6.3}",
            r.donor_id_1,
            r.donor_id_2,
            r.component,
            r.emd,
            r.pval.unwrap_or(f64::NAN)
        );
    }

    println!("\nComponent 1 matrix (p > 0.05 zeroed):");
    let matrix = DonorMatrix::from_table(&table, 1, Some(0.05));
    matrix.write_csv(std::io::stdout())?;

    Ok(())
}
