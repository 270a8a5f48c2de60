use ark_ff::{One, UniformRand, Zero};
use ark_std::test_rng;
use ark_test_curves::bls12_381::Fr;
use pgroup_buchberger::{
    compute_free_basis, compute_restricted_basis,
    groebner::is_groebner_basis,
    poly::{
        module::{ModuleElement, ModuleTerm},
        monomial::Monomial,
    },
    reduce::{reduce, Reducers},
    Buchberger, BuchbergerConfig, DegRevLexMonomial, Error, Fgs, GroupAlgebra, GroupContext,
    InputError, LexMonomial, Operand, PolynomialAlgebra, Rgs, SelectionStrategy, TruncatedAlgebra,
    GF3, GF5,
};
use rand::Rng;

type M = DegRevLexMonomial;

/// Random element with `num_terms` terms whose exponents stay below `bound`.
fn rand_element<A, R>(
    algebra: &A,
    rank: usize,
    num_terms: usize,
    bound: u16,
    rng: &mut R,
) -> ModuleElement<A::Field, A::Monomial>
where
    A: GroupAlgebra,
    R: Rng,
{
    let terms: Vec<_> = (0..num_terms)
        .map(|_| {
            let exponents: Vec<(usize, u16)> = (0..algebra.num_generators())
                .map(|var| (var, rng.gen_range(0..bound)))
                .collect();
            (
                A::Field::rand(rng),
                ModuleTerm::new(rng.gen_range(0..rank), A::Monomial::new(&exponents)),
            )
        })
        .collect();
    ModuleElement::new(rank, &terms)
}

/// Random combination `sum c_i m_i g_i` of `elements`.
fn rand_combination<A, R>(
    algebra: &A,
    rank: usize,
    elements: &[ModuleElement<A::Field, A::Monomial>],
    bound: u16,
    rng: &mut R,
) -> ModuleElement<A::Field, A::Monomial>
where
    A: GroupAlgebra,
    R: Rng,
{
    let mut sum = ModuleElement::zero_with_rank(rank);
    for g in elements {
        for _ in 0..3 {
            let exponents: Vec<(usize, u16)> = (0..algebra.num_generators())
                .map(|var| (var, rng.gen_range(0..bound)))
                .collect();
            let m = A::Monomial::new(&exponents);
            if algebra.contains(&m) {
                sum += &g.mul_term(algebra, A::Field::rand(rng), &m).unwrap();
            }
        }
    }
    sum
}

fn assert_leads_not_divisible<F: ark_ff::Field, N: Monomial>(elements: &[ModuleElement<F, N>]) {
    for (j, g) in elements.iter().enumerate() {
        let (_, lt_j) = g.leading_term().unwrap();
        for f in &elements[..j] {
            let (_, lt_i) = f.leading_term().unwrap();
            assert!(lt_i.divides(lt_j).is_none(), "{:?} divides {:?}", lt_i, lt_j);
        }
    }
}

#[test]
fn test_zero_reduction_closure_in_polynomial_module() {
    let rng = &mut test_rng();
    let context = GroupContext::new(PolynomialAlgebra::<GF5, M>::new(2), 2);
    for _ in 0..5 {
        let generators: Vec<_> = (0..3)
            .map(|_| rand_element(context.algebra(), 2, 3, 3, rng))
            .filter(|g| !g.is_zero())
            .collect();
        if generators.is_empty() {
            continue;
        }
        let fgs = compute_free_basis(&generators, &context).unwrap();

        assert!(is_groebner_basis(fgs.elements(), &[], context.algebra()).unwrap());
        assert_leads_not_divisible(fgs.elements());
        assert!(fgs.elements().iter().all(|f| f.leading_coefficient() == Some(GF5::one())));
        for g in &generators {
            assert!(fgs.contains(g, &context).unwrap());
        }
        for _ in 0..10 {
            let f = rand_combination(context.algebra(), 2, &generators, 3, rng);
            assert!(fgs.contains(&f, &context).unwrap());
        }
    }
}

#[test]
fn test_zero_reduction_closure_in_group_algebra() {
    let rng = &mut test_rng();
    // GF(5)[C_5 x C_5]
    let algebra = TruncatedAlgebra::<GF5, M>::abelian_p_group(&[5, 5]).unwrap();
    let context = GroupContext::new(algebra, 2);
    for _ in 0..5 {
        let generators: Vec<_> = (0..2)
            .map(|_| rand_element(context.algebra(), 2, 4, 5, rng))
            .filter(|g| !g.is_zero())
            .collect();
        if generators.is_empty() {
            continue;
        }
        let fgs = compute_free_basis(&generators, &context).unwrap();

        assert!(is_groebner_basis(fgs.elements(), &[], context.algebra()).unwrap());
        assert_leads_not_divisible(fgs.elements());
        for _ in 0..10 {
            let f = rand_combination(context.algebra(), 2, &generators, 5, rng);
            assert!(fgs.contains(&f, &context).unwrap());
        }
        let dimension = fgs.quotient_dimension(&context).unwrap();
        assert!(dimension < 50);
    }
}

#[test]
fn test_annihilator_found_by_relation_pairs() {
    // GF(3)[C_9], the element x^7 vanishes once multiplied by x^2
    let algebra = TruncatedAlgebra::<GF3, M>::abelian_p_group(&[9]).unwrap();
    let context = GroupContext::new(algebra, 1);
    let one = GF3::one();
    let generators = vec![ModuleElement::from_components(&[vec![
        (one, M::var(0, 7)),
        (one, M::var(0, 3)),
    ]])];
    let fgs = compute_free_basis(&generators, &context).unwrap();

    // x^2 (x^7 + x^3) = x^5 lies in the submodule
    let x5 = ModuleElement::from_components(&[vec![(one, M::var(0, 5))]]);
    assert!(fgs.contains(&x5, &context).unwrap());
    assert!(fgs.stats().pairs_considered > 0);
    // span is (x^3), quotient has basis 1, x, x^2
    assert_eq!(fgs.quotient_dimension(&context), Some(3));
}

#[test]
fn test_completion_is_idempotent_and_deterministic() {
    let rng = &mut test_rng();
    let context = GroupContext::new(PolynomialAlgebra::<GF5, M>::new(2), 2);
    let generators: Vec<_> = (0..3)
        .map(|_| rand_element(context.algebra(), 2, 3, 3, rng))
        .filter(|g| !g.is_zero())
        .collect();

    let first = compute_free_basis(&generators, &context).unwrap();
    let second = compute_free_basis(&generators, &context).unwrap();
    assert_eq!(first, second);

    let again = compute_free_basis(first.elements(), &context).unwrap();
    assert_eq!(again.elements(), first.elements());
    assert_eq!(again.stats().zero_reductions, again.stats().reductions);

    let reduce_config = BuchbergerConfig::default().with_interreduce(true);
    let reduced = Buchberger::with_config(&context, reduce_config.clone())
        .complete_free(&generators)
        .unwrap();
    let reduced_again = Buchberger::with_config(&context, reduce_config)
        .complete_free(again.elements())
        .unwrap();
    assert_eq!(reduced.elements(), reduced_again.elements());
}

#[test]
fn test_strategies_give_the_same_reduced_basis() {
    let rng = &mut test_rng();
    let context = GroupContext::new(PolynomialAlgebra::<GF5, LexMonomial>::new(2), 1);
    let generators: Vec<_> = (0..3)
        .map(|_| rand_element(context.algebra(), 1, 3, 3, rng))
        .filter(|g| !g.is_zero())
        .collect();

    let complete = |strategy| {
        let config = BuchbergerConfig::default()
            .with_strategy(strategy)
            .with_interreduce(true);
        Buchberger::with_config(&context, config)
            .complete_free(&generators)
            .unwrap()
    };
    let sugar = complete(SelectionStrategy::Sugar);
    let normal = complete(SelectionStrategy::Normal);
    assert_eq!(sugar.elements(), normal.elements());
}

#[test]
fn test_restricted_closure() {
    let rng = &mut test_rng();
    let algebra = TruncatedAlgebra::<GF3, M>::abelian_p_group(&[3, 3]).unwrap();
    let context = GroupContext::new(algebra, 2);

    let relations: Vec<_> = (0..2)
        .map(|_| rand_element(context.algebra(), 2, 3, 3, rng))
        .filter(|g| !g.is_zero())
        .collect();
    let prior = if relations.is_empty() {
        Fgs::empty(2)
    } else {
        compute_free_basis(&relations, &context).unwrap()
    };

    let generators: Vec<_> = (0..2)
        .map(|_| rand_element(context.algebra(), 2, 3, 3, rng))
        .filter(|g| !g.is_zero())
        .collect();
    if generators.is_empty() {
        return;
    }
    let rgs = compute_restricted_basis(&generators, &context, &prior).unwrap();

    assert!(is_groebner_basis(rgs.elements(), prior.elements(), context.algebra()).unwrap());
    let prior_reducers = Reducers::free(prior.elements());
    for f in rgs.elements() {
        assert_eq!(&reduce(f, &prior_reducers, context.algebra()).unwrap(), f);
    }

    let spanning: Vec<_> = relations.iter().chain(generators.iter()).cloned().collect();
    for _ in 0..10 {
        let f = rand_combination(context.algebra(), 2, &spanning, 3, rng);
        assert!(rgs.contains(&f, &context).unwrap());
    }
}

#[test]
fn test_restricted_system_merges_into_a_groebner_basis() {
    let rng = &mut test_rng();
    let context = GroupContext::new(PolynomialAlgebra::<GF5, LexMonomial>::new(2), 1);

    for _ in 0..20 {
        let relation = rand_element(context.algebra(), 1, 2, 3, rng);
        let generators: Vec<_> = (0..2)
            .map(|_| rand_element(context.algebra(), 1, 3, 3, rng))
            .filter(|g| !g.is_zero())
            .collect();
        if relation.is_zero() || generators.is_empty() {
            continue;
        }
        let prior = compute_free_basis(&[relation.clone()], &context).unwrap();
        let rgs = compute_restricted_basis(&generators, &context, &prior).unwrap();
        let merged = rgs.clone().into_fgs();

        assert!(is_groebner_basis(merged.elements(), &[], context.algebra()).unwrap());
        assert!(merged.contains(&relation, &context).unwrap());
        let spanning: Vec<_> = generators
            .iter()
            .chain(std::iter::once(&relation))
            .cloned()
            .collect();
        for _ in 0..5 {
            let f = rand_combination(context.algebra(), 1, &spanning, 3, rng);
            assert_eq!(merged.contains(&f, &context), rgs.contains(&f, &context));
            assert!(merged.contains(&f, &context).unwrap());
        }
    }
}

#[test]
fn test_restricted_with_empty_prior_equals_free() {
    let rng = &mut test_rng();
    let context = GroupContext::new(PolynomialAlgebra::<GF5, M>::new(2), 2);
    let generators: Vec<_> = (0..3)
        .map(|_| rand_element(context.algebra(), 2, 3, 3, rng))
        .filter(|g| !g.is_zero())
        .collect();

    let free = Fgs::buchberger(&generators, &context).unwrap();
    let prior = Fgs::empty(2);
    let restricted = Rgs::buchberger(&generators, &context, &prior).unwrap();
    assert_eq!(restricted.elements(), free.elements());
    assert_eq!(restricted.stats(), free.stats());
}

#[test]
fn test_large_field() {
    let rng = &mut test_rng();
    let context = GroupContext::new(PolynomialAlgebra::<Fr, M>::new(2), 2);
    let generators: Vec<_> = (0..3)
        .map(|_| rand_element(context.algebra(), 2, 3, 3, rng))
        .filter(|g| !g.is_zero())
        .collect();
    let fgs = compute_free_basis(&generators, &context).unwrap();

    assert!(is_groebner_basis(fgs.elements(), &[], context.algebra()).unwrap());
    for _ in 0..5 {
        let f = rand_combination(context.algebra(), 2, &generators, 3, rng);
        assert!(fgs.contains(&f, &context).unwrap());
    }
}

#[test]
fn test_input_errors() {
    let algebra = TruncatedAlgebra::<GF3, M>::abelian_p_group(&[3]).unwrap();
    let context = GroupContext::new(algebra, 2);
    let one = GF3::one();

    assert_eq!(
        compute_free_basis(&[], &context).unwrap_err(),
        Error::InvalidInput(InputError::EmptyGenerators)
    );

    let good = ModuleElement::from_components(&[vec![(one, M::var(0, 1))], vec![]]);
    let outside = ModuleElement::new(2, &[(one, ModuleTerm::new(5, M::one()))]);
    assert_eq!(
        compute_free_basis(&[good.clone(), outside], &context).unwrap_err(),
        Error::InvalidInput(InputError::PositionOutOfRange {
            operand: Operand::Generator(1),
            position: 5,
            rank: 2
        })
    );

    let vanishing = ModuleElement::from_components(&[vec![(one, M::var(0, 3))], vec![]]);
    assert_eq!(
        compute_free_basis(&[vanishing], &context).unwrap_err(),
        Error::InvalidInput(InputError::MonomialOutsideAlgebra {
            operand: Operand::Generator(0)
        })
    );

    let wrong_rank = ModuleElement::from_components(&[vec![(one, M::one())]]);
    assert!(compute_free_basis(&[wrong_rank], &context)
        .unwrap_err()
        .is_invalid_input());

    let prior = Fgs::empty(1);
    assert!(matches!(
        compute_restricted_basis(&[good], &context, &prior),
        Err(Error::ArithmeticInconsistency(_))
    ));
}

#[test]
fn test_pair_cap_reports_resource_exhaustion() {
    // (x^2 - y, xy - 1) needs a second S-vector after discovering x - y^2
    let context = GroupContext::new(PolynomialAlgebra::<GF5, LexMonomial>::new(2), 1);
    let one = GF5::one();
    let generators = vec![
        ModuleElement::from_components(&[vec![
            (one, LexMonomial::var(0, 2)),
            (-one, LexMonomial::var(1, 1)),
        ]]),
        ModuleElement::from_components(&[vec![
            (one, LexMonomial::new(&[(0, 1), (1, 1)])),
            (-one, LexMonomial::one()),
        ]]),
    ];

    let config = BuchbergerConfig::default().with_max_pairs(1);
    match Buchberger::with_config(&context, config).complete_free(&generators) {
        Err(Error::ResourceExhausted { limit, basis_len }) => {
            assert_eq!(limit, 1);
            assert_eq!(basis_len, 3);
        },
        other => panic!("expected resource exhaustion, got {:?}", other),
    }

    let fgs = compute_free_basis(&generators, &context).unwrap();
    assert!(fgs.stats().pairs_selected > 1);
}
