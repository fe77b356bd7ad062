/// Implements `RpcFunction::call` from an `async fn`-shaped body, filling in
/// the `Domain` and `Range` associated types from its signature.
#[macro_export]
macro_rules! call {
    (async fn call(& $self:ident, $domain_ident:ident : $domain_ty:ty) -> $range_ty:ty { $($body:tt)* }) => {
        type Domain = $domain_ty;
        type Range = $range_ty;

        fn call<'call>(&'call $self, $domain_ident: $domain_ty) -> $crate::BoxFuture<'call, Self::Range> {
            let body = async move {
                $($body)*
            };
            Box::pin(body)
        }
    };
}

/// Implements `RpcFunction::name`, the key the function is dispatched by.
#[macro_export]
macro_rules! name {
    ($name:expr) => {
        fn name(&self) -> &str {
            $name
        }
    };
}
