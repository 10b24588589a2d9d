//! Integration tests for the augmentation pipeline.
//!
//! These tests exercise the kernels together on CIFAR-sized synthetic batches
//! and run the Burn transform wrappers end to end.

use burn_ndarray::NdArray;
use ndarray::{concatenate, Array2, Array4, Axis};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use batchaug::all::*;

type TestBackend = NdArray;

/// Random CHW images with one-hot labels over `n_classes`.
fn create_synthetic_batch(n: usize, n_classes: usize, size: usize) -> ImageBatch {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let labels = Array2::from_shape_fn((n, n_classes), |(i, c)| if i % n_classes == c { 1.0 } else { 0.0 });
    let images = Array4::from_shape_fn((n, 3, size, size), |_| rng.gen::<f32>());
    ImageBatch::new(labels, images, DataFormat::Nchw).unwrap()
}

fn assert_rows_sum_to_one(batch: &ImageBatch) {
    for row in batch.labels().outer_iter() {
        assert!((row.sum() - 1.0).abs() < 1e-4, "label row sums to {}", row.sum());
    }
}

#[test]
fn test_jitter_constant_batch_unchanged() {
    let images = Array4::<f32>::ones((24, 3, 32, 32));
    let mut rng = SeededSource::default();
    let out = jitter(&images, DataFormat::Nchw, &mut rng).unwrap();
    assert_eq!(out, images);
}

#[test]
fn test_jitter_ones_and_zeros_unchanged() {
    let ones = Array4::<f32>::ones((24, 3, 16, 16));
    let zeros = Array4::<f32>::zeros((24, 3, 16, 16));
    let images = concatenate(Axis(0), &[ones.view(), zeros.view()]).unwrap();
    assert_eq!(images.dim(), (48, 3, 16, 16));

    let mut rng = SeededSource::new(Seed::new(1));
    let out = jitter(&images, DataFormat::Nchw, &mut rng).unwrap();
    assert_eq!(out, images);
}

#[test]
fn test_jitter_moves_column_pattern() {
    let pattern = [1.0f32, 1.0, 1.0, 2.0];
    let images = Array4::from_shape_fn((128, 3, 32, 32), |(_, _, _, x)| pattern[x % 4]);

    let mut rng = SeededSource::default();
    let out = jitter(&images, DataFormat::Nchw, &mut rng).unwrap();
    assert_eq!(out.dim(), images.dim());
    assert_ne!(out, images);
    assert!(out.iter().all(|&v| v == 1.0 || v == 2.0));
}

#[test]
fn test_mixup_then_ricap_keep_distributions() {
    let batch = create_synthetic_batch(64, 10, 32);
    let mut rng = SeededSource::new(Seed::new(7));

    let mixed = mixup(&batch, &mut rng).unwrap();
    assert_eq!(mixed.images().dim(), batch.images().dim());
    assert_rows_sum_to_one(&mixed);

    let patched = ricap(&mixed, &mut rng).unwrap();
    assert_eq!(patched.images().dim(), batch.images().dim());
    assert_eq!(patched.format(), DataFormat::Nchw);
    assert_rows_sum_to_one(&patched);
}

#[test]
fn test_same_seed_same_augmentations() {
    let batch = create_synthetic_batch(16, 4, 16);

    let run = |seed: u64| {
        let mut rng = SeededSource::new(Seed::new(seed));
        let a = ricap(&batch, &mut rng).unwrap();
        let b = mixup(&a, &mut rng).unwrap();
        jitter_batch(&b, &JitterConfig::default(), &mut rng).unwrap()
    };

    assert_eq!(run(3), run(3));
    assert_ne!(run(3), run(4));
}

#[test]
fn test_ricap_nhwc_matches_nchw() {
    let batch = create_synthetic_batch(8, 4, 16);
    let nhwc = batch.to_format(DataFormat::Nhwc);

    let from_nchw = ricap(&batch, &mut SeededSource::new(Seed::new(9))).unwrap();
    let from_nhwc = ricap(&nhwc, &mut SeededSource::new(Seed::new(9))).unwrap();

    assert_eq!(from_nhwc.format(), DataFormat::Nhwc);
    assert_eq!(from_nhwc.to_format(DataFormat::Nchw), from_nchw);
}

#[test]
fn test_loader_feeds_transforms() {
    let data = create_synthetic_batch(100, 5, 16);
    let mut loader = ImageDataLoader::builder(data)
        .batch_size(32)
        .shuffle(true)
        .seed(Seed::new(42))
        .build()
        .unwrap();

    let batches = loader.epoch().unwrap();
    assert_eq!(batches.len(), 3);

    let mut rng = SeededSource::default();
    for batch in &batches {
        let out = ricap(batch, &mut rng).unwrap();
        assert_eq!(out.batch_size(), 32);
        assert_rows_sum_to_one(&out);
    }
}

#[test]
fn test_compose_pipeline_on_burn_tensors() {
    let device = Default::default();
    let batch = create_synthetic_batch(12, 3, 16);
    let tensors = ImageTensorBatch::<TestBackend>::from_image_batch(&batch, &device);

    let pipeline = Compose::<TestBackend>::new()
        .add(Jitter::default().with_seed(Seed::new(1)))
        .add(MixUp::new(0.2).with_seed(Seed::new(2)))
        .add(Ricap::new(0.2).with_seed(Seed::new(3)));
    assert_eq!(pipeline.len(), 3);

    let valid = pipeline.apply(tensors.clone(), Split::Valid).unwrap();
    assert_eq!(valid.to_image_batch().unwrap(), batch);

    let train = pipeline.apply(tensors, Split::Train).unwrap();
    assert_eq!(train.images.dims(), [12, 3, 16, 16]);
    assert_eq!(train.labels.dims(), [12, 3]);

    let host = train.to_image_batch().unwrap();
    assert_ne!(host, batch);
    assert_rows_sum_to_one(&host);
}

#[test]
fn test_configs_from_json() {
    let mixup: MixUpConfig =
        serde_json::from_str(r#"{"alpha": 0.4, "flip_axis": "Width", "p": 0.5}"#).unwrap();
    assert_eq!(mixup.flip_axis, SpatialAxis::Width);

    let ricap: RicapConfig = serde_json::from_str(r#"{"alpha": 1.0, "p": 1.0}"#).unwrap();
    assert_eq!(ricap.alpha, 1.0);

    let json = serde_json::to_string(&JitterConfig::default()).unwrap();
    let jitter: JitterConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(jitter.pad, 4);
}
