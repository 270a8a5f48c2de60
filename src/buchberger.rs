//! Buchberger completion of free and restricted generating systems.
//!
//! A free generating system ([`Fgs`]) spans a submodule of `A^rank`. A
//! restricted generating system ([`Rgs`]) spans a submodule of the quotient of
//! `A^rank` by a previously completed `Fgs`, which it borrows and never changes.
//!
//! Both are completed by the same driver: generators are reduced and inserted
//! one by one, every insertion queues critical pairs against the earlier basis
//! elements, the prior basis and the monomial relations of the algebra, and
//! pairs are then popped, tested, turned into S-vectors and reduced until the
//! queue runs dry.

use crate::{
    algebra::{GroupAlgebra, GroupContext},
    criteria::{pair_lcm, Eliminator, PartnerRef, Skip},
    error::{Error, InputError, Operand, Result},
    groebner::{self, leading_terms},
    pairs::{CriticalPair, PairQueue, Partner, SelectionStrategy},
    poly::{
        module::{ModuleElement, ModuleTerm},
        monomial::Monomial,
    },
    reduce::{reduce, Reducers},
};
use ark_ff::{Field, Zero};
use tracing::{debug, info, trace};

/// Tuning knobs of a completion run. None of them change the span of the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuchbergerConfig {
    pub strategy: SelectionStrategy,
    pub product_criterion: bool,
    pub chain_criterion: bool,
    /// Abort with [`Error::ResourceExhausted`] once this many S-vectors have been reduced.
    pub max_pairs: Option<usize>,
    /// Hand back the reduced Gröbner basis instead of the basis in insertion order.
    pub interreduce: bool,
}

impl Default for BuchbergerConfig {
    fn default() -> Self {
        Self {
            strategy: SelectionStrategy::Sugar,
            product_criterion: true,
            chain_criterion: true,
            max_pairs: None,
            interreduce: false,
        }
    }
}

impl BuchbergerConfig {
    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_product_criterion(mut self, enabled: bool) -> Self {
        self.product_criterion = enabled;
        self
    }

    pub fn with_chain_criterion(mut self, enabled: bool) -> Self {
        self.chain_criterion = enabled;
        self
    }

    pub fn with_max_pairs(mut self, limit: usize) -> Self {
        self.max_pairs = Some(limit);
        self
    }

    pub fn with_interreduce(mut self, enabled: bool) -> Self {
        self.interreduce = enabled;
        self
    }

    fn eliminator(&self) -> Eliminator {
        Eliminator {
            product: self.product_criterion,
            chain: self.chain_criterion,
        }
    }
}

/// Counters of a completion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionStats {
    /// Critical pairs formed, skipped or not.
    pub pairs_considered: usize,
    pub skipped_position: usize,
    pub skipped_product: usize,
    pub skipped_chain: usize,
    /// Pairs that survived the criteria and had their S-vector reduced.
    pub pairs_selected: usize,
    pub reductions: usize,
    pub zero_reductions: usize,
    /// Generators that reduced to zero while seeding.
    pub generators_discarded: usize,
}

impl CompletionStats {
    fn record(&mut self, skip: Skip) {
        match skip {
            Skip::Position => self.skipped_position += 1,
            Skip::Product => self.skipped_product += 1,
            Skip::Chain => self.skipped_chain += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped_position + self.skipped_product + self.skipped_chain
    }
}

/// A free generating system: a Gröbner basis of a submodule of `A^rank`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fgs<F: Field, M: Monomial> {
    rank: usize,
    elements: Vec<ModuleElement<F, M>>,
    stats: CompletionStats,
}

impl<F: Field, M: Monomial> Fgs<F, M> {
    /// The basis of the zero submodule.
    pub fn empty(rank: usize) -> Self {
        Self {
            rank,
            elements: Vec::new(),
            stats: CompletionStats::default(),
        }
    }

    /// Completes `generators` with the default configuration.
    pub fn buchberger<A>(
        generators: &[ModuleElement<F, M>],
        context: &GroupContext<A>,
    ) -> Result<Self>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        Buchberger::new(context).complete_free(generators)
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Basis elements, in insertion order unless the run inter-reduced them.
    pub fn elements(&self) -> &[ModuleElement<F, M>] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<ModuleElement<F, M>> {
        self.elements
    }

    pub fn leading_terms(&self) -> Vec<&ModuleTerm<M>> {
        leading_terms(&self.elements)
    }

    pub fn stats(&self) -> &CompletionStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Normal form of `element` modulo the basis.
    pub fn reduce<A>(
        &self,
        element: &ModuleElement<F, M>,
        context: &GroupContext<A>,
    ) -> Result<ModuleElement<F, M>>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        context.check_element(Operand::Query, element)?;
        reduce(element, &Reducers::free(&self.elements), context.algebra())
    }

    /// Whether `element` lies in the span of the basis.
    pub fn contains<A>(
        &self,
        element: &ModuleElement<F, M>,
        context: &GroupContext<A>,
    ) -> Result<bool>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        self.reduce(element, context).map(|r| r.is_zero())
    }

    /// Dimension of `A^rank` modulo the span, when the algebra is finite.
    pub fn quotient_dimension<A>(&self, context: &GroupContext<A>) -> Option<usize>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        groebner::quotient_dimension(&self.leading_terms(), self.rank, context.algebra())
    }
}

/// A restricted generating system, taken modulo a previously completed [`Fgs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rgs<'p, F: Field, M: Monomial> {
    prior: &'p Fgs<F, M>,
    fgs: Fgs<F, M>,
}

impl<'p, F: Field, M: Monomial> Rgs<'p, F, M> {
    /// Completes `generators` modulo `prior` with the default configuration.
    pub fn buchberger<A>(
        generators: &[ModuleElement<F, M>],
        context: &GroupContext<A>,
        prior: &'p Fgs<F, M>,
    ) -> Result<Self>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        Buchberger::new(context).complete_restricted(generators, prior)
    }

    pub fn prior(&self) -> &'p Fgs<F, M> {
        self.prior
    }

    pub fn rank(&self) -> usize {
        self.fgs.rank
    }

    /// The new elements, each in normal form modulo the prior basis.
    pub fn elements(&self) -> &[ModuleElement<F, M>] {
        &self.fgs.elements
    }

    pub fn leading_terms(&self) -> Vec<&ModuleTerm<M>> {
        self.fgs.leading_terms()
    }

    pub fn stats(&self) -> &CompletionStats {
        &self.fgs.stats
    }

    pub fn len(&self) -> usize {
        self.fgs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fgs.is_empty()
    }

    pub fn into_elements(self) -> Vec<ModuleElement<F, M>> {
        self.fgs.elements
    }

    /// The prior basis followed by the new elements, a Gröbner basis of the sum of both spans.
    pub fn into_fgs(self) -> Fgs<F, M> {
        let mut elements = self.prior.elements.clone();
        elements.extend(self.fgs.elements);
        Fgs {
            rank: self.fgs.rank,
            elements,
            stats: self.fgs.stats,
        }
    }

    /// Normal form of `element` modulo the prior basis and the new elements.
    pub fn reduce<A>(
        &self,
        element: &ModuleElement<F, M>,
        context: &GroupContext<A>,
    ) -> Result<ModuleElement<F, M>>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        context.check_element(Operand::Query, element)?;
        let reducers = Reducers::restricted(&self.prior.elements, &self.fgs.elements);
        reduce(element, &reducers, context.algebra())
    }

    /// Whether `element` vanishes in the quotient by the prior basis and the new elements.
    pub fn contains<A>(
        &self,
        element: &ModuleElement<F, M>,
        context: &GroupContext<A>,
    ) -> Result<bool>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        self.reduce(element, context).map(|r| r.is_zero())
    }

    pub fn quotient_dimension<A>(&self, context: &GroupContext<A>) -> Option<usize>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        let mut leading = self.prior.leading_terms();
        leading.extend(self.fgs.leading_terms());
        groebner::quotient_dimension(&leading, self.fgs.rank, context.algebra())
    }
}

/// A configured completion bound to one group context.
#[derive(Debug, Clone)]
pub struct Buchberger<'c, A: GroupAlgebra> {
    context: &'c GroupContext<A>,
    config: BuchbergerConfig,
}

impl<'c, A: GroupAlgebra> Buchberger<'c, A> {
    pub fn new(context: &'c GroupContext<A>) -> Self {
        Self::with_config(context, BuchbergerConfig::default())
    }

    pub fn with_config(context: &'c GroupContext<A>, config: BuchbergerConfig) -> Self {
        Self { context, config }
    }

    pub fn config(&self) -> &BuchbergerConfig {
        &self.config
    }

    pub fn complete_free(
        &self,
        generators: &[ModuleElement<A::Field, A::Monomial>],
    ) -> Result<Fgs<A::Field, A::Monomial>> {
        self.validate(generators)?;
        Completion::new(self.context, &self.config, &[]).run(generators)
    }

    pub fn complete_restricted<'p>(
        &self,
        generators: &[ModuleElement<A::Field, A::Monomial>],
        prior: &'p Fgs<A::Field, A::Monomial>,
    ) -> Result<Rgs<'p, A::Field, A::Monomial>> {
        self.validate(generators)?;
        if prior.rank() != self.context.rank() {
            return Err(Error::ArithmeticInconsistency(format!(
                "prior basis has rank {}, the context has rank {}",
                prior.rank(),
                self.context.rank()
            )));
        }
        let fgs = Completion::new(self.context, &self.config, prior.elements()).run(generators)?;
        Ok(Rgs { prior, fgs })
    }

    fn validate(&self, generators: &[ModuleElement<A::Field, A::Monomial>]) -> Result<()> {
        if generators.is_empty() {
            return Err(InputError::EmptyGenerators.into());
        }
        generators
            .iter()
            .enumerate()
            .try_for_each(|(index, g)| self.context.check_element(Operand::Generator(index), g))
    }
}

/// Completes `generators` into a free generating system (`nFgsBuchberger`).
pub fn compute_free_basis<A: GroupAlgebra>(
    generators: &[ModuleElement<A::Field, A::Monomial>],
    context: &GroupContext<A>,
) -> Result<Fgs<A::Field, A::Monomial>> {
    Fgs::buchberger(generators, context)
}

/// Completes `generators` modulo `prior` into a restricted generating system (`nRgsBuchberger`).
pub fn compute_restricted_basis<'p, A: GroupAlgebra>(
    generators: &[ModuleElement<A::Field, A::Monomial>],
    context: &GroupContext<A>,
    prior: &'p Fgs<A::Field, A::Monomial>,
) -> Result<Rgs<'p, A::Field, A::Monomial>> {
    Rgs::buchberger(generators, context, prior)
}

/// State of one completion run.
struct Completion<'a, A: GroupAlgebra> {
    context: &'a GroupContext<A>,
    config: &'a BuchbergerConfig,
    eliminator: Eliminator,
    prior: &'a [ModuleElement<A::Field, A::Monomial>],
    basis: Vec<ModuleElement<A::Field, A::Monomial>>,
    sugars: Vec<u32>,
    queue: PairQueue<A::Monomial>,
    stats: CompletionStats,
}

impl<'a, A: GroupAlgebra> Completion<'a, A> {
    fn new(
        context: &'a GroupContext<A>,
        config: &'a BuchbergerConfig,
        prior: &'a [ModuleElement<A::Field, A::Monomial>],
    ) -> Self {
        Self {
            context,
            config,
            eliminator: config.eliminator(),
            prior,
            basis: Vec::new(),
            sugars: Vec::new(),
            queue: PairQueue::new(config.strategy),
            stats: CompletionStats::default(),
        }
    }

    fn run(
        mut self,
        generators: &[ModuleElement<A::Field, A::Monomial>],
    ) -> Result<Fgs<A::Field, A::Monomial>> {
        info!(
            generators = generators.len(),
            prior = self.prior.len(),
            rank = self.context.rank(),
            "Buchberger start"
        );
        let context = self.context;
        let algebra = context.algebra();

        for g in generators {
            let r = reduce(g, &Reducers::restricted(self.prior, &self.basis), algebra)?;
            if r.is_zero() {
                self.stats.generators_discarded += 1;
                continue;
            }
            let sugar = r.degree();
            self.insert(r, sugar)?;
        }

        while let Some(pair) = self.queue.pop() {
            if let Some(skip) = self.eliminator.on_select(&pair, &self.basis, &self.queue) {
                trace!(i = pair.i, partner = ?pair.partner, ?skip, "pair skipped");
                self.stats.record(skip);
                continue;
            }
            if let Some(limit) = self.config.max_pairs {
                if self.stats.pairs_selected >= limit {
                    return Err(Error::ResourceExhausted {
                        limit,
                        basis_len: self.basis.len(),
                    });
                }
            }
            self.stats.pairs_selected += 1;

            let Some(s) = self.s_vector(&pair)? else {
                continue;
            };
            self.stats.reductions += 1;
            let r = reduce(&s, &Reducers::restricted(self.prior, &self.basis), algebra)?;
            if r.is_zero() {
                self.stats.zero_reductions += 1;
            } else {
                self.insert(r, pair.sugar)?;
            }
        }

        let mut elements = self.basis;
        if self.config.interreduce {
            groebner::reduce_groebner_basis(&mut elements, self.prior, algebra)?;
        }

        info!(
            len = elements.len(),
            pairs = self.stats.pairs_considered,
            skipped = self.stats.skipped(),
            reductions = self.stats.reductions,
            zero_reductions = self.stats.zero_reductions,
            "Buchberger end"
        );
        Ok(Fgs {
            rank: context.rank(),
            elements,
            stats: self.stats,
        })
    }

    /// Appends the monic form of `element` and queues its pairs.
    fn insert(&mut self, element: ModuleElement<A::Field, A::Monomial>, sugar: u32) -> Result<()> {
        let element = element.monic().ok_or_else(|| {
            Error::ArithmeticInconsistency("leading coefficient is not invertible".to_string())
        })?;
        debug_assert!(element.leading_term().map_or(false, |(_, lt)| {
            !Reducers::restricted(self.prior, &self.basis).is_reducible(lt, self.context.algebra())
        }));

        let i = self.basis.len();
        let leading = element.leading_term().map(|(_, t)| t);
        debug!(index = i, sugar, ?leading, "basis element inserted");
        self.basis.push(element);
        self.sugars.push(sugar);

        for j in 0..i {
            self.enqueue(i, Partner::Basis(j));
        }
        for k in 0..self.prior.len() {
            self.enqueue(i, Partner::Prior(k));
        }
        for r in 0..self.context.algebra().relations().len() {
            self.enqueue(i, Partner::Relation(r));
        }
        Ok(())
    }

    fn enqueue(&mut self, i: usize, partner: Partner) {
        self.stats.pairs_considered += 1;
        let relations = self.context.algebra().relations();
        let f = &self.basis[i];
        let (partner_ref, partner_sugar) = match partner {
            Partner::Basis(j) => (PartnerRef::Element(&self.basis[j]), self.sugars[j]),
            Partner::Prior(k) => (PartnerRef::Element(&self.prior[k]), self.prior[k].degree()),
            Partner::Relation(r) => (PartnerRef::Relation(&relations[r]), relations[r].degree()),
        };

        if let Some(skip) = self.eliminator.on_enqueue(f, partner_ref) {
            trace!(i, ?partner, ?skip, "pair skipped");
            self.stats.record(skip);
            return;
        }
        let Some(lcm) = pair_lcm(f, partner_ref) else {
            return;
        };

        let lcm_degree = lcm.monomial.degree();
        let lead_degree = |m: Option<&A::Monomial>| m.map_or(0, |m| m.degree());
        let partner_lead = match partner_ref {
            PartnerRef::Element(g) => lead_degree(g.leading_monomial()),
            PartnerRef::Relation(r) => r.degree(),
        };
        let sugar = self.sugars[i]
            .saturating_add(lcm_degree - lead_degree(f.leading_monomial()))
            .max(partner_sugar.saturating_add(lcm_degree - partner_lead));

        self.queue.push(i, partner, lcm, sugar);
    }

    fn s_vector(
        &self,
        pair: &CriticalPair<A::Monomial>,
    ) -> Result<Option<ModuleElement<A::Field, A::Monomial>>> {
        let algebra = self.context.algebra();
        let f = &self.basis[pair.i];
        match pair.partner {
            Partner::Basis(j) => f.s_vector(&self.basis[j], algebra),
            Partner::Prior(k) => f.s_vector(&self.prior[k], algebra),
            Partner::Relation(r) => f.relation_s_vector(&algebra.relations()[r], algebra),
        }
    }
}
