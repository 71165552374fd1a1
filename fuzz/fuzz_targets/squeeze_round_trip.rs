#![no_main]

// Validates that the squeeze transform is lossless: squeezing an arbitrary image with arbitrary
// (possibly invalid) parameters and then running the reference inverse must restore the input.

use libfuzzer_sys::{arbitrary, fuzz_target};
use modular_squeeze::inverse::inv_squeeze;
use modular_squeeze::{
    fwd_squeeze, Channel, Executor, Image, SqueezeOutcome, SqueezeParams, MAX_SAMPLE_BITS,
};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct FuzzChannel {
    pub w: u8,
    pub h: u8,
    pub seed: i32,
    pub samples: Vec<i32>,
}

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct FuzzParams {
    pub horizontal: bool,
    pub in_place: bool,
    pub begin_c: u8,
    pub num_c: u8,
}

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct FuzzInput {
    pub channels: Vec<FuzzChannel>,
    pub nb_meta_channels: u8,
    pub params: Vec<FuzzParams>,
    pub multithreaded: bool,
}

fn build_channel(input: &FuzzChannel) -> Channel {
    let (w, h) = (usize::from(input.w % 48), usize::from(input.h % 48));
    let mut channel = Channel::create(w, h, 0, 0).unwrap();
    let shift = 32 - MAX_SAMPLE_BITS;
    for (i, pixel) in channel.pixels_mut().iter_mut().enumerate() {
        let sample = match input.samples.get(i) {
            Some(&sample) => sample,
            None => input.seed.wrapping_mul(i as i32 + 1),
        };
        *pixel = sample.wrapping_shl(shift) >> shift;
    }
    channel
}

fn build_image(input: &FuzzInput) -> Image {
    let channels: Vec<_> = input.channels.iter().take(6).map(build_channel).collect();
    let nb_meta_channels = usize::from(input.nb_meta_channels).min(channels.len());
    Image::new(channels, nb_meta_channels)
}

fuzz_target!(|input: FuzzInput| {
    let params: Vec<_> = input
        .params
        .iter()
        .take(8)
        .map(|p| SqueezeParams {
            horizontal: p.horizontal,
            in_place: p.in_place,
            begin_c: u32::from(p.begin_c % 16),
            num_c: u32::from(p.num_c % 8),
        })
        .collect();
    let executor = if input.multithreaded {
        Executor::default()
    } else {
        Executor::Sequential
    };

    let original = build_image(&input);
    let mut image = build_image(&input);
    match fwd_squeeze(&mut image, &params, &executor) {
        Ok(SqueezeOutcome::Applied { steps }) => {
            inv_squeeze(&mut image, &steps).unwrap();
            assert_eq!(
                image.channels(),
                original.channels(),
                "Squeeze round trip did not restore the input\nParameters: {steps:?}"
            );
        }
        Ok(SqueezeOutcome::NotApplied) => assert_eq!(image.channels(), original.channels()),
        // Invalid parameters, and squeezing residuals whose range is too wide, are expected.
        Err(_) => {}
    }
});
