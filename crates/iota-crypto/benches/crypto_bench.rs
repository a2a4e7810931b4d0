use criterion::{black_box, criterion_group, criterion_main, Criterion};
use iota_crypto::{
    Keypair, MultiSigPublicKey, SignatureScheme, SignatureVerifier, Signer,
};

const MESSAGE: &[u8] = b"benchmark personal message";

fn bench_single_signers(c: &mut Criterion) {
    for scheme in [
        SignatureScheme::Ed25519,
        SignatureScheme::Secp256k1,
        SignatureScheme::Secp256r1,
    ] {
        let keypair = Keypair::from_secret_key(scheme, &[7u8; 32]).unwrap();
        let public_key = keypair.public_key();
        let signed = keypair.sign_personal_message(MESSAGE);

        c.bench_function(&format!("{}_sign", scheme.name()), |b| {
            b.iter(|| keypair.sign_personal_message(black_box(MESSAGE)))
        });
        c.bench_function(&format!("{}_verify", scheme.name()), |b| {
            b.iter(|| public_key.verify_personal_message(black_box(MESSAGE), &signed.signature))
        });
    }
}

fn bench_multisig(c: &mut Criterion) {
    let keypairs: Vec<Keypair> = vec![
        Keypair::from_secret_key(SignatureScheme::Ed25519, &[1u8; 32]).unwrap(),
        Keypair::from_secret_key(SignatureScheme::Secp256k1, &[2u8; 32]).unwrap(),
        Keypair::from_secret_key(SignatureScheme::Secp256r1, &[3u8; 32]).unwrap(),
    ];
    let multisig = MultiSigPublicKey::from_public_keys(
        keypairs.iter().map(|k| (k.public_key(), 1)),
        3,
    )
    .unwrap();
    let partials: Vec<String> = keypairs
        .iter()
        .map(|k| k.sign_personal_message(MESSAGE).signature)
        .collect();
    let combined = multisig.combine_partial_signatures(&partials).unwrap();

    c.bench_function("multisig_combine", |b| {
        b.iter(|| multisig.combine_partial_signatures(black_box(&partials)))
    });
    c.bench_function("multisig_verify", |b| {
        b.iter(|| multisig.verify_personal_message(black_box(MESSAGE), &combined))
    });
    c.bench_function("multisig_address", |b| b.iter(|| black_box(&multisig).to_address()));
}

criterion_group!(benches, bench_single_signers, bench_multisig);
criterion_main!(benches);
