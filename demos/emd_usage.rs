use donor_emd::*;

fn main() {
    println!("=== donor_emd: 1-D Earth Mover's Distance Examples ===\n");

    shifted_samples_example();
    println!();
    unequal_sizes_example();
}

fn shifted_samples_example() {
    println!("1. Shifted samples");
    println!("------------------");

    let a = vec![0.0, 1.0, 3.0];
    for shift in [0.0, 0.5, 5.0] {
        let b: Vec<f64> = a.iter().map(|x| x + shift).collect();
        let emd = wasserstein_1d(&a, &b).unwrap_or(f64::NAN);
        println!("shift {:>4.1} → EMD {:.3}", shift, emd);
    }
}

fn unequal_sizes_example() {
    println!("2. Samples of different sizes");
    println!("-----------------------------");

    let small = vec![1.0];
    let large = vec![2.0, 4.0];
    let emd = wasserstein_1d(&small, &large).unwrap_or(f64::NAN);
    println!("EMD({:?}, {:?}) = {:.3}", small, large, emd);
    println!("Each observation carries mass 1/n of its own sample.");
}
