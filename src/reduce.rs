//! Full reduction of module elements to normal form.

use crate::{
    algebra::GroupAlgebra,
    error::{Error, Result},
    poly::{
        module::{ModuleElement, ModuleTerm},
        monomial::Monomial,
    },
};
use ark_ff::{Field, Zero};

/// The elements a reduction may divide by.
///
/// In restricted mode the prior basis is searched before the basis itself.
#[derive(Debug)]
pub struct Reducers<'a, F: Field, M: Monomial> {
    prior: &'a [ModuleElement<F, M>],
    basis: &'a [ModuleElement<F, M>],
    exclude: Option<usize>,
}

impl<F: Field, M: Monomial> Clone for Reducers<'_, F, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: Field, M: Monomial> Copy for Reducers<'_, F, M> {}

impl<'a, F: Field, M: Monomial> Reducers<'a, F, M> {
    pub fn free(basis: &'a [ModuleElement<F, M>]) -> Self {
        Self {
            prior: &[],
            basis,
            exclude: None,
        }
    }

    pub fn restricted(prior: &'a [ModuleElement<F, M>], basis: &'a [ModuleElement<F, M>]) -> Self {
        Self {
            prior,
            basis,
            exclude: None,
        }
    }

    /// Leaves the basis element at `index` out of the search.
    pub fn excluding(mut self, index: usize) -> Self {
        self.exclude = Some(index);
        self
    }

    /// First reducer whose leading term divides `term` in `algebra`, with the cofactor.
    pub fn find_reducer<A>(
        &self,
        term: &ModuleTerm<M>,
        algebra: &A,
    ) -> Option<(&'a ModuleElement<F, M>, M)>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        let basis = self
            .basis
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.exclude)
            .map(|(_, g)| g);
        self.prior.iter().chain(basis).find_map(|g| {
            let (_, lt) = g.leading_term()?;
            lt.cofactor(term, algebra).map(|w| (g, w))
        })
    }

    /// Whether some reducer's leading term divides `term`.
    pub fn is_reducible<A>(&self, term: &ModuleTerm<M>, algebra: &A) -> bool
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        self.find_reducer(term, algebra).is_some()
    }
}

/// Reduces `element` until none of its terms is divisible by a reducer's leading term.
///
/// Irreducible leading terms are moved into the normal form one at a time, so
/// every step works on the current leading term of the remainder and must
/// strictly lower it.
pub fn reduce<A>(
    element: &ModuleElement<A::Field, A::Monomial>,
    reducers: &Reducers<'_, A::Field, A::Monomial>,
    algebra: &A,
) -> Result<ModuleElement<A::Field, A::Monomial>>
where
    A: GroupAlgebra,
{
    if element.is_zero() {
        return Ok(element.clone());
    }

    let mut remainder = element.clone();
    let mut normal_form = Vec::new();

    while let Some((coefficient, term)) = remainder.leading_term().cloned() {
        match reducers.find_reducer(&term, algebra) {
            Some((g, cofactor)) => {
                let lc = g
                    .leading_coefficient()
                    .and_then(|lc| lc.inverse())
                    .ok_or_else(|| {
                        Error::ArithmeticInconsistency(format!(
                            "reducer with leading term {:?} has no invertible leading coefficient",
                            g.leading_term().map(|(_, t)| t)
                        ))
                    })?;
                remainder.sub_multiple(g, coefficient * lc, &cofactor, algebra)?;

                if let Some((_, next)) = remainder.leading_term() {
                    if next >= &term {
                        return Err(Error::ArithmeticInconsistency(format!(
                            "reduction step at {:?} did not lower the leading term, got {:?}",
                            term, next
                        )));
                    }
                }
            },
            None => {
                remainder.terms.pop();
                normal_form.push((coefficient, term));
            },
        }
    }

    normal_form.reverse();
    Ok(ModuleElement {
        rank: element.rank(),
        terms: normal_form,
    })
}

/// Whether `element` lies in the span of the reducers, assuming they form a Gröbner basis.
pub fn reduces_to_zero<A>(
    element: &ModuleElement<A::Field, A::Monomial>,
    reducers: &Reducers<'_, A::Field, A::Monomial>,
    algebra: &A,
) -> Result<bool>
where
    A: GroupAlgebra,
{
    reduce(element, reducers, algebra).map(|r| r.is_zero())
}
