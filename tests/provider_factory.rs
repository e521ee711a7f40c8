//! Integration tests for number/vector provider construction and the
//! literal fallback policy.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use particle_def::prelude::*;
use particle_def::provider::{ColorGradient, NumberProviderMapping, PfMapType};

fn tree(value: serde_json::Value) -> KvObject {
    KvObject::try_from(value).unwrap()
}

fn states() -> Vec<(Particle, SystemRenderState)> {
    let mut aged = Particle::new();
    aged.age = 3.0;
    aged.index = 12;
    aged.velocity = Vec3::new(1.0, 1.0, 1.0);
    vec![
        (Particle::new(), SystemRenderState::new()),
        (
            aged,
            SystemRenderState::new()
                .with_age(100.0)
                .with_detail_level(3)
                .with_particle_count(40)
                .with_control_point(0, ControlPoint::at(Vec3::splat(5.0))),
        ),
    ]
}

#[test]
fn test_literal_number_ignores_state() {
    let t = tree(json!({"m_flRadius": 5.0}));
    let provider = DefinitionParser::new(&t).number_provider("m_flRadius").unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    for (particle, state) in states() {
        assert_eq!(provider.next_number(&mut rng, &particle, &state), 5.0);
    }
}

#[test]
fn test_random_uniform_is_dispatched() {
    let t = tree(json!({"m_flRadius": {"m_nType": "PF_TYPE_RANDOM_UNIFORM"}}));
    let sink = CollectingSink::new();
    let provider = DefinitionParser::with_sink(&t, &sink).number_provider("m_flRadius").unwrap();
    assert_eq!(provider, NumberProvider::RandomUniform { min: 0.0, max: 1.0 });
    assert_eq!(provider.provider_type(), NumberProviderType::RandomUniform);
    assert!(sink.is_empty());
}

#[test]
fn test_random_is_deterministic_for_a_seed() {
    let t = tree(json!({
        "m_flRadius": {"m_nType": "PF_TYPE_RANDOM_BIASED", "m_flRandomMin": -1, "m_flRandomMax": 1},
    }));
    let provider = DefinitionParser::new(&t).number_provider("m_flRadius").unwrap();
    let (particle, state) = (Particle::new(), SystemRenderState::new());
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..8)
            .map(|_| provider.next_number(&mut rng, &particle, &state))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(5), run(5));
    assert!(run(5).iter().all(|v| (-1.0..=1.0).contains(v)));
}

#[test]
fn test_unknown_number_type_without_fallback_fails() {
    let t = tree(json!({"m_flRadius": {"m_nType": "PF_TYPE_CONTROL_POINT_CHANGE_AGE"}}));
    let sink = CollectingSink::new();
    let err = DefinitionParser::with_sink(&t, &sink).number_provider("m_flRadius").unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedProviderType { kind: ProviderKind::Number, ref type_name }
            if type_name == "PF_TYPE_CONTROL_POINT_CHANGE_AGE"
    ));
    assert!(sink.is_empty());
}

#[test]
fn test_unknown_number_type_with_fallback() {
    let t = tree(json!({"m_flRadius": {"m_nType": "PF_TYPE_ENDCAP_AGE", "m_flLiteralValue": 2.0}}));
    let sink = CollectingSink::new();
    let provider = DefinitionParser::with_sink(&t, &sink).number_provider("m_flRadius").unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    for (particle, state) in states() {
        assert_eq!(provider.next_number(&mut rng, &particle, &state), 2.0);
    }
    assert_eq!(
        sink.diagnostics(),
        vec![Diagnostic::LiteralFallback {
            kind: ProviderKind::Number,
            type_name: "PF_TYPE_ENDCAP_AGE".into(),
            key: "m_flRadius".into(),
        }]
    );
}

#[test]
fn test_discriminator_is_matched_exactly() {
    let t = tree(json!({"m_flRadius": {"m_nType": "pf_type_random_uniform"}}));
    let err = DefinitionParser::new(&t).number_provider("m_flRadius").unwrap_err();
    assert!(matches!(err, Error::UnsupportedProviderType { .. }));
}

#[test]
fn test_number_provider_or() {
    let t = tree(json!({}));
    let parse = DefinitionParser::new(&t);
    assert_eq!(
        parse.number_provider_or("m_flRadius", NumberProvider::Literal(8.0)).unwrap(),
        NumberProvider::Literal(8.0)
    );
}

#[test]
fn test_mapped_provider_reads_mapping() {
    let t = tree(json!({
        "m_flOpacity": {
            "m_nType": "PF_TYPE_PARTICLE_AGE",
            "m_nMapType": "PF_MAP_TYPE_REMAP",
            "m_flInput0": 0.0,
            "m_flInput1": 4.0,
            "m_flOutput0": 1.0,
            "m_flOutput1": 0.0,
        },
    }));
    let provider = DefinitionParser::new(&t).number_provider("m_flOpacity").unwrap();
    let NumberProvider::ParticleAge { mapping } = &provider else {
        panic!("expected particle age provider, got {provider:?}");
    };
    assert_eq!(mapping.map_type, PfMapType::Remap);
    assert_ne!(*mapping, NumberProviderMapping::default());

    let mut particle = Particle::new();
    particle.age = 1.0;
    let state = SystemRenderState::new();
    let v = provider.next_number(&mut StdRng::seed_from_u64(0), &particle, &state);
    assert_eq!(v, 0.75);
}

#[test]
fn test_vector_without_discriminator_is_inline_data() {
    let t = tree(json!({
        "m_vecColor": {"x": 1, "0": 0.25, "1": 0.5, "2": 0.75},
        "m_vecScale": [2, 2, 2],
    }));
    let sink = CollectingSink::new();
    let parse = DefinitionParser::with_sink(&t, &sink);
    assert_eq!(
        parse.vector_provider("m_vecColor").unwrap(),
        VectorProvider::Literal(Vec3::new(0.25, 0.5, 0.75))
    );
    assert_eq!(
        parse.vector_provider("m_vecScale").unwrap(),
        VectorProvider::Literal(Vec3::splat(2.0))
    );
    assert!(sink.is_empty());
}

#[test]
fn test_vector_fallback_and_failure() {
    let t = tree(json!({
        "fallback": {"m_nType": "PVEC_TYPE_RANDOM_UNIFORM_OFFSET", "m_vLiteralValue": [0, 1, 0]},
        "failure": {"m_nType": "PVEC_TYPE_CP_RELATIVE_RANDOM_DIR"},
    }));
    let sink = CollectingSink::new();
    let parse = DefinitionParser::with_sink(&t, &sink);

    assert_eq!(parse.vector_provider("fallback").unwrap(), VectorProvider::Literal(Vec3::Y));
    assert_eq!(sink.len(), 1);

    assert!(matches!(
        parse.vector_provider("failure"),
        Err(Error::UnsupportedProviderType { kind: ProviderKind::Vector, .. })
    ));
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_nested_providers_share_the_sink() {
    let t = tree(json!({
        "m_vecOffset": {
            "m_nType": "PVEC_TYPE_FLOAT_COMPONENTS",
            "m_FloatComponentX": {"m_nType": "PF_TYPE_PARTICLE_NOISE", "m_flLiteralValue": 3.0},
            "m_FloatComponentY": {"m_nType": "PF_TYPE_COLLECTION_AGE"},
        },
    }));
    let sink = CollectingSink::new();
    let provider = DefinitionParser::with_sink(&t, &sink).vector_provider("m_vecOffset").unwrap();

    let state = SystemRenderState::new().with_age(6.0);
    let v = provider.next_vector(&mut StdRng::seed_from_u64(0), &Particle::new(), &state);
    assert_eq!(v, Vec3::new(3.0, 6.0, 0.0));

    let diagnostics = sink.take();
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        &diagnostics[0],
        Diagnostic::LiteralFallback { key, .. } if key == "m_FloatComponentX"
    ));
}

#[test]
fn test_gradient_provider() {
    let t = tree(json!({
        "m_vecColor": {
            "m_nType": "PVEC_TYPE_FLOAT_INTERP_GRADIENT",
            "m_FloatInterp": {"m_nType": "PF_TYPE_PARTICLE_NUMBER_NORMALIZED"},
            "m_flInterpInput0": 0.0,
            "m_flInterpInput1": 1.0,
            "m_Gradient": {
                "m_Stops": [
                    {"m_flPosition": 0.0, "m_Color": [255, 0, 0, 255]},
                    {"m_flPosition": 1.0, "m_Color": [0, 255, 0, 255]},
                ],
            },
        },
    }));
    let provider = DefinitionParser::new(&t).vector_provider("m_vecColor").unwrap();
    let VectorProvider::ColorGradient { gradient, .. } = &provider else {
        panic!("expected gradient provider, got {provider:?}");
    };
    assert_eq!(gradient.stops().len(), 2);
    assert_ne!(*gradient, ColorGradient::default());

    let mut particle = Particle::new();
    particle.index = 1;
    let state = SystemRenderState::new().with_particle_count(4);
    let c = provider.next_vector(&mut StdRng::seed_from_u64(0), &particle, &state);
    assert_eq!(c, Vec3::new(0.75, 0.25, 0.0));
}

#[test]
fn test_providers_outlive_the_tree() {
    let provider = {
        let t = tree(json!({
            "m_flRadius": {
                "m_nType": "PF_TYPE_PARTICLE_DETAIL_LEVEL",
                "m_flLOD0": 4,
                "m_flLOD3": 1,
            },
        }));
        DefinitionParser::new(&t).number_provider("m_flRadius").unwrap()
    };
    let state = SystemRenderState::new().with_detail_level(3);
    let v = provider.next_number(&mut StdRng::seed_from_u64(0), &Particle::new(), &state);
    assert_eq!(v, 1.0);
}
